//! Text fragments to complete `\n`-terminated lines.

use futures_util::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;

/// Splits incoming text into lines, carrying the unterminated tail.
///
/// Each byte is scanned once: after a push, the search resumes at the first
/// byte of the new fragment, and consumed lines are drained from the carry
/// buffer in one step.
#[derive(Debug, Default)]
pub struct LineFramer {
    carry: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fragment` and return every line it completes, delimiter removed.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        let mut scan_from = self.carry.len();
        self.carry.push_str(fragment);

        let mut lines = Vec::new();
        let mut line_start = 0;
        while let Some(offset) = self.carry[scan_from..].find('\n') {
            let newline = scan_from + offset;
            lines.push(self.carry[line_start..newline].to_string());
            line_start = newline + 1;
            scan_from = line_start;
        }
        self.carry.drain(..line_start);
        lines
    }

    /// Text received after the last newline.
    pub fn remainder(&self) -> &str {
        &self.carry
    }

    /// End of stream: hand back the unterminated remainder, if any.
    ///
    /// The wire format newline-terminates every frame, so callers do not
    /// treat the remainder as a line.
    pub fn finish(&mut self) -> Option<String> {
        if self.carry.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.carry))
        }
    }
}

/// Turn a stream of text fragments into a stream of complete lines.
///
/// An unterminated trailing line at end of stream is discarded. Source
/// errors are passed through and end the sequence.
pub fn frame_lines<S, E>(source: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<String, E>> + Unpin,
{
    stream::unfold(
        Some((source, LineFramer::new(), VecDeque::new())),
        |state| async move {
            let (mut source, mut framer, mut ready) = state?;
            loop {
                if let Some(line) = ready.pop_front() {
                    return Some((Ok(line), Some((source, framer, ready))));
                }
                match source.next().await {
                    Some(Ok(fragment)) => ready.extend(framer.push(&fragment)),
                    Some(Err(e)) => return Some((Err(e), None)),
                    None => {
                        if let Some(rest) = framer.finish() {
                            tracing::debug!(
                                "Discarding unterminated trailing line ({} bytes)",
                                rest.len()
                            );
                        }
                        return None;
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_complete_lines() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("a\nb\n"), vec!["a", "b"]);
        assert_eq!(framer.remainder(), "");
    }

    #[test]
    fn test_partial_line_carried_to_next_push() {
        let mut framer = LineFramer::new();
        assert!(framer.push("data:Hel").is_empty());
        assert_eq!(framer.remainder(), "data:Hel");
        assert_eq!(framer.push("lo\ndata:"), vec!["data:Hello"]);
        assert_eq!(framer.remainder(), "data:");
    }

    #[test]
    fn test_empty_lines_preserved() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("x\n\n\ny\n"), vec!["x", "", "", "y"]);
    }

    #[test]
    fn test_carriage_return_is_content() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("data:a\r\n"), vec!["data:a\r"]);
    }

    #[test]
    fn test_finish_returns_unterminated_tail() {
        let mut framer = LineFramer::new();
        framer.push("done\ntail");
        assert_eq!(framer.finish(), Some("tail".to_string()));
        assert_eq!(framer.finish(), None);
    }

    #[tokio::test]
    async fn test_frame_lines_discards_trailing_partial() {
        let source = futures::stream::iter(vec![
            Ok::<_, ()>("data:one\nda".to_string()),
            Ok("ta:two\ndata:thr".to_string()),
            Ok("ee".to_string()),
        ]);
        let lines: Vec<_> = frame_lines(source).collect().await;
        assert_eq!(lines, vec![Ok("data:one".to_string()), Ok("data:two".to_string())]);
    }

    #[tokio::test]
    async fn test_frame_lines_error_after_buffered_lines() {
        let source = futures::stream::iter(vec![Ok("a\nb\n".to_string()), Err("aborted")]);
        let lines: Vec<_> = frame_lines(source).collect().await;
        assert_eq!(
            lines,
            vec![Ok("a".to_string()), Ok("b".to_string()), Err("aborted")]
        );
    }
}
