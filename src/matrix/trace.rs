//! Step-by-step record of the row operations performed by the elimination
//! algorithms.

use crate::error::MatrixError;
use crate::matrix::matrix::Matrix;
use crate::rings::fraction::Fraction;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    #[default]
    Silent,
    /// One snapshot per processed pivot step.
    Snapshots,
    /// Every swap, scale and combination, each followed by a snapshot.
    Steps,
}

impl TryFrom<u8> for Verbosity {
    type Error = MatrixError;

    fn try_from(level: u8) -> Result<Self, MatrixError> {
        match level {
            0 => Ok(Verbosity::Silent),
            1 => Ok(Verbosity::Snapshots),
            2 => Ok(Verbosity::Steps),
            _ => Err(MatrixError::InvalidVerbosity(level)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Working copy before any operation.
    Initial(Matrix),
    Swap { a: usize, b: usize },
    Scale { row: usize, factor: Fraction },
    /// `r{target} += r{source} * factor`
    Combine {
        target: usize,
        source: usize,
        factor: Fraction,
    },
    Snapshot(Matrix),
}

impl TraceEvent {
    pub fn is_operation(&self) -> bool {
        matches!(
            self,
            TraceEvent::Swap { .. } | TraceEvent::Scale { .. } | TraceEvent::Combine { .. }
        )
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Initial(m) => write!(f, "Initial: \n{}", m),
            TraceEvent::Swap { a, b } => write!(f, "r{} <-> r{}", a, b),
            TraceEvent::Scale { row, factor } => write!(f, "r{} *= {}", row, factor),
            TraceEvent::Combine {
                target,
                source,
                factor,
            } => write!(f, "r{} += r{} * {}", target, source, factor),
            TraceEvent::Snapshot(m) => write!(f, "{}", m),
        }
    }
}

/// Receives trace events in the order the operations are applied.
pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

impl TraceSink for () {
    fn record(&mut self, _event: TraceEvent) {}
}

impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Renders every event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintSink;

impl TraceSink for PrintSink {
    fn record(&mut self, event: TraceEvent) {
        println!("{}", event);
    }
}

/// Renders every event through `tracing` at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&mut self, event: TraceEvent) {
        tracing::info!(target: "gauss_exact::trace", "{}", event);
    }
}

/// Verbosity-aware front of a sink, shared by the elimination algorithms.
pub(crate) struct Tracer<'a, S: TraceSink + ?Sized> {
    verbosity: Verbosity,
    sink: &'a mut S,
}

impl<'a, S: TraceSink + ?Sized> Tracer<'a, S> {
    pub(crate) fn new(verbosity: Verbosity, sink: &'a mut S) -> Self {
        Tracer { verbosity, sink }
    }

    pub(crate) fn initial(&mut self, m: &Matrix) {
        if self.verbosity >= Verbosity::Snapshots {
            self.sink.record(TraceEvent::Initial(m.clone()));
        }
    }

    /// Operation followed by the resulting state, only at `Steps`.
    pub(crate) fn step(&mut self, event: TraceEvent, m: &Matrix) {
        if self.verbosity >= Verbosity::Steps {
            self.sink.record(event);
            self.sink.record(TraceEvent::Snapshot(m.clone()));
        }
    }

    /// End of an outer iteration, only at `Snapshots`.
    pub(crate) fn iteration_done(&mut self, m: &Matrix) {
        if self.verbosity == Verbosity::Snapshots {
            self.sink.record(TraceEvent::Snapshot(m.clone()));
        }
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Verbosity::try_from(0), Ok(Verbosity::Silent));
        assert_eq!(Verbosity::try_from(1), Ok(Verbosity::Snapshots));
        assert_eq!(Verbosity::try_from(2), Ok(Verbosity::Steps));
        assert_eq!(
            Verbosity::try_from(3),
            Err(MatrixError::InvalidVerbosity(3))
        );
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn test_event_rendering() {
        let m = Matrix::new(vec![vec![1, 2], vec![3, 4]]).unwrap();

        assert_eq!(TraceEvent::Swap { a: 0, b: 2 }.to_string(), "r0 <-> r2");
        assert_eq!(
            TraceEvent::Scale {
                row: 1,
                factor: "1/3".parse().unwrap()
            }
            .to_string(),
            "r1 *= 1/3"
        );
        assert_eq!(
            TraceEvent::Combine {
                target: 1,
                source: 0,
                factor: Fraction::from(-3)
            }
            .to_string(),
            "r1 += r0 * -3"
        );
        assert_eq!(
            TraceEvent::Initial(m.clone()).to_string(),
            format!("Initial: \n{}", m)
        );
        assert_eq!(TraceEvent::Snapshot(m.clone()).to_string(), m.to_string());
        assert!(!TraceEvent::Snapshot(m).is_operation());
    }

    #[test]
    fn test_tracer_filters_by_level() {
        let m = Matrix::new(vec![vec![1]]).unwrap();
        let swap = TraceEvent::Swap { a: 0, b: 1 };

        let mut events = Vec::new();
        let mut tracer = Tracer::new(Verbosity::Snapshots, &mut events);
        tracer.initial(&m);
        tracer.step(swap.clone(), &m);
        tracer.iteration_done(&m);
        assert_eq!(
            events,
            vec![TraceEvent::Initial(m.clone()), TraceEvent::Snapshot(m.clone())]
        );

        let mut events = Vec::new();
        let mut tracer = Tracer::new(Verbosity::Steps, &mut events);
        tracer.step(swap.clone(), &m);
        tracer.iteration_done(&m);
        assert_eq!(events, vec![swap, TraceEvent::Snapshot(m.clone())]);

        let mut events = Vec::new();
        let mut tracer = Tracer::new(Verbosity::Silent, &mut events);
        tracer.initial(&m);
        tracer.iteration_done(&m);
        assert!(events.is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_sink_renders_through_tracing() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let m = Matrix::new(vec![vec![0, 1], vec![1, 0]]).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            m.echelon_form(Verbosity::Steps, &mut LogSink);
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("gauss_exact::trace"));
        assert!(output.contains("Initial:"));
        assert!(output.contains("r0 <-> r1"));
        // DEBUG records from the algorithm itself are filtered out.
        assert!(!output.contains("row echelon form"));
    }

    #[test]
    fn test_print_sink_accepts_every_event() {
        let m = Matrix::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let mut events = Vec::new();
        m.det(Verbosity::Steps, &mut events).unwrap();
        assert!(!events.is_empty());

        let mut sink = PrintSink;
        for event in events {
            sink.record(event);
        }
        assert_eq!(m.det(Verbosity::Steps, &mut sink).unwrap(), -2);
    }
}
