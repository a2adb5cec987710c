//! HTTP Range request parsing module
//!
//! Single `bytes=` ranges only (RFC 7233). Multi-range and other units are
//! ignored and the full body is served.

/// Inclusive byte span within a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn len(self) -> usize {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a body of `total` bytes
    pub fn content_range(self, total: usize) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Outcome of applying a Range header to a body length
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header, serve everything
    Full,
    /// Serve the given span with 206
    Partial(ByteRange),
    /// Reply 416
    NotSatisfiable,
}

/// Resolve a Range header against a body of `len` bytes
///
/// # Examples
/// `bytes=0-99`, `bytes=100-` and `bytes=-20` are accepted; a start at or
/// past the end of the body is not satisfiable.
pub fn parse_range_header(range_header: Option<&str>, len: usize) -> RangeOutcome {
    let Some(ranges) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if ranges.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = ranges.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        // Suffix form: the final `last` bytes
        let Ok(suffix) = last.parse::<usize>() else {
            return RangeOutcome::Full;
        };
        if suffix == 0 || len == 0 {
            return RangeOutcome::NotSatisfiable;
        }
        return RangeOutcome::Partial(ByteRange {
            start: len.saturating_sub(suffix),
            end: len - 1,
        });
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= len {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if last.is_empty() {
        len - 1
    } else {
        match last.parse::<usize>() {
            Ok(end) if end < start => return RangeOutcome::NotSatisfiable,
            Ok(end) => end.min(len - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };

    RangeOutcome::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeOutcome::Full);
        assert_eq!(parse_range_header(Some("items=0-1"), 100), RangeOutcome::Full);
    }

    #[test]
    fn test_bounded_and_open_ranges() {
        let RangeOutcome::Partial(r) = parse_range_header(Some("bytes=0-9"), 100) else {
            panic!("expected partial");
        };
        assert_eq!((r.start, r.end, r.len()), (0, 9, 10));
        assert_eq!(r.content_range(100), "bytes 0-9/100");

        let RangeOutcome::Partial(r) = parse_range_header(Some("bytes=50-"), 100) else {
            panic!("expected partial");
        };
        assert_eq!((r.start, r.end), (50, 99));

        let RangeOutcome::Partial(r) = parse_range_header(Some("bytes=90-500"), 100) else {
            panic!("expected partial");
        };
        assert_eq!(r.end, 99);
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            parse_range_header(Some("bytes=-20"), 100),
            RangeOutcome::Partial(ByteRange { start: 80, end: 99 })
        );
        assert_eq!(
            parse_range_header(Some("bytes=-500"), 100),
            RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
        );
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=9-3"), 100),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=-5"), 0),
            RangeOutcome::NotSatisfiable
        );
    }

    #[test]
    fn test_malformed_is_ignored() {
        assert_eq!(parse_range_header(Some("bytes=a-b"), 100), RangeOutcome::Full);
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Full
        );
        assert_eq!(parse_range_header(Some("bytes=5"), 100), RangeOutcome::Full);
    }
}
