//! Print output sinks.
//!
//! The `print` and `exit` statements write through a sink owned by the
//! interpreter, so embedders and tests can capture output instead of
//! inheriting the process's stdout.

use std::cell::RefCell;
use std::rc::Rc;

/// Destination for `print` output. One call per printed line, without the
/// trailing newline.
pub trait PrintSink {
    fn write_line(&mut self, text: &str);
}

/// Default sink: the process's stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl PrintSink for StdoutSink {
    fn write_line(&mut self, text: &str) {
        println!("{text}");
    }
}

/// A sink that collects output into a shared string, for tests and
/// programmatic embedding.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    buffer: Rc<RefCell<String>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, newline-terminated per line.
    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl PrintSink for CaptureSink {
    fn write_line(&mut self, text: &str) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(text);
        buffer.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_sink_collects_lines() {
        let sink = CaptureSink::new();
        let mut writer = sink.clone();
        writer.write_line("one");
        writer.write_line("two");
        assert_eq!(sink.contents(), "one\ntwo\n");
    }
}
