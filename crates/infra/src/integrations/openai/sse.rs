//! Incremental decoder for `text/event-stream` bodies

/// Splits arbitrary byte chunks into `data:` payloads.
///
/// Lines may span chunk boundaries; incomplete trailing bytes stay buffered
/// until the next [`feed`](SseDecoder::feed). Comments, `event:`/`id:` fields
/// and blank separators are dropped.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

pub(crate) const DONE_MARKER: &str = "[DONE]";

impl SseDecoder {
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\r', '\n']);

            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim_start();
            if data == DONE_MARKER {
                self.done = true;
                self.buffer.clear();
                break;
            }
            if !data.is_empty() {
                payloads.push(data.to_string());
            }
        }
        payloads
    }

    /// True once the `[DONE]` sentinel was seen.
    pub fn is_done(&self) -> bool {
        self.done
    }
}
