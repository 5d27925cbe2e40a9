//! Line splitting with LF / CRLF / CR normalization
//!
//! Every search path in the crate compares lines through this module, so the
//! cached index, the reread index and all five strategies agree on what a
//! "line" is. Terminators are never part of the yielded slice.

use memchr::memchr2;
use std::io::{self, BufRead};

/// Iterator over the lines of a byte buffer with terminators stripped
///
/// A terminator at the very end of the buffer does not open an extra empty
/// line, while an unterminated final line is still yielded.
pub struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let (line, next) = line_at(self.data, self.pos);
        self.pos = next;
        Some(line)
    }
}

/// Split `data` into normalized lines
#[inline]
pub fn lines(data: &[u8]) -> Lines<'_> {
    Lines::new(data)
}

/// Return the line starting at `start` and the offset of the following line
///
/// `start` must be a line start. The returned offset is `data.len()` for the
/// last line.
#[inline]
pub fn line_at(data: &[u8], start: usize) -> (&[u8], usize) {
    let rest = &data[start..];
    match memchr2(b'\n', b'\r', rest) {
        Some(i) => {
            let end = start + i;
            let next = if rest[i] == b'\r' && rest.get(i + 1) == Some(&b'\n') {
                end + 2
            } else {
                end + 1
            };
            (&data[start..end], next)
        }
        None => (rest, data.len()),
    }
}

/// Smallest line start that is `>= pos`, or `data.len()` if there is none
pub fn line_start_at_or_after(data: &[u8], pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    if pos >= data.len() {
        return data.len();
    }
    match data[pos - 1] {
        b'\n' => return pos,
        // A CR directly followed by LF is one CRLF terminator, so pos sits inside it
        b'\r' if data[pos] != b'\n' => return pos,
        _ => {}
    }
    match memchr2(b'\n', b'\r', &data[pos..]) {
        Some(i) => {
            let t = pos + i;
            if data[t] == b'\r' && data.get(t + 1) == Some(&b'\n') {
                t + 2
            } else {
                t + 1
            }
        }
        None => data.len(),
    }
}

/// Stream normalized lines out of `reader`, stopping once `visit` returns `true`
///
/// Produces exactly the lines [`Lines`] yields for the same bytes, without
/// holding more than one LF-delimited chunk in memory. Returns whether
/// `visit` stopped the scan.
pub fn scan_lines<R, F>(mut reader: R, mut visit: F) -> io::Result<bool>
where
    R: BufRead,
    F: FnMut(&[u8]) -> bool,
{
    let mut chunk = Vec::with_capacity(256);
    loop {
        chunk.clear();
        if reader.read_until(b'\n', &mut chunk)? == 0 {
            return Ok(false);
        }

        let mut body = chunk.as_slice();
        let terminated = body.last() == Some(&b'\n');
        if terminated {
            body = &body[..body.len() - 1];
            if body.last() == Some(&b'\r') {
                body = &body[..body.len() - 1];
            }
        } else if body.last() == Some(&b'\r') {
            // A final bare CR terminates the last line, it does not open a new one
            body = &body[..body.len() - 1];
        }

        for line in body.split(|&b| b == b'\r') {
            if visit(line) {
                return Ok(true);
            }
        }
    }
}

/// A query with an embedded terminator byte can never equal a normalized line
#[inline]
pub fn is_matchable(query: &[u8]) -> bool {
    memchr2(b'\n', b'\r', query).is_none()
}
