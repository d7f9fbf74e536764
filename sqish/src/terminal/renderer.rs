const DEFAULT_BUFFER_CAPACITY: usize = 1024;
use std::io::{self, Stdout, Write};

/// Buffered terminal writer that batches escape sequences and text into one
/// write per frame.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write = Stdout> {
    buffer: Vec<u8>,
    sink: W,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    /// Renderer over stdout with the default buffer capacity.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(sink: W) -> Self {
        TerminalRenderer {
            buffer: Vec::with_capacity(DEFAULT_BUFFER_CAPACITY),
            sink,
        }
    }

    /// Write the buffered frame out and clear the buffer.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.sink.write_all(&self.buffer)?;
        self.sink.flush()?;
        self.buffer.clear();
        Ok(())
    }

    #[cfg(test)]
    pub fn sink(&self) -> &W {
        &self.sink
    }
}

impl<W: Write> Write for TerminalRenderer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        TerminalRenderer::flush(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_reaches_sink_before_flush() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        write!(renderer, "> git").unwrap();
        assert!(renderer.sink().is_empty());

        Write::flush(&mut renderer).unwrap();
        assert_eq!(renderer.sink().as_slice(), b"> git");

        // Empty flush writes nothing.
        Write::flush(&mut renderer).unwrap();
        assert_eq!(renderer.sink().len(), 5);
    }
}
