//! Fragment serialization: flatten positioned words into one text string.

use crate::model::{DocumentRef, Fragment};

use super::RawBox;

/// Internal marker replacing a line-ending hyphen. Distinct from an
/// ordinary hyphen, so a word-internal `-` is never confused with a line
/// break.
pub const SOFT_HYPHEN: char = '\u{00AD}';

/// Serialize normalized boxes into fragments and the document's flat
/// string.
///
/// Each word is trimmed and followed by a single space, since the
/// extractor strips spaces between words; a word ending in the soft-hyphen
/// marker instead drops the marker and gets no separator, joining it to
/// the next word. Offsets and lengths are counted in characters.
///
/// Guarantee: the concatenation of the returned fragments' `text` equals
/// the returned flat string exactly.
pub fn serialize_boxes(doc: &DocumentRef, boxes: Vec<RawBox>) -> (Vec<Fragment>, String) {
    let mut fragments = Vec::with_capacity(boxes.len());
    let mut flat = String::new();
    let mut offset = 0usize;

    for b in boxes {
        let trimmed = b.text.trim();
        let mut text = String::with_capacity(trimmed.len() + 1);
        if let Some(stem) = trimmed.strip_suffix(SOFT_HYPHEN) {
            text.push_str(stem);
        } else {
            text.push_str(trimmed);
            text.push(' ');
        }

        let length = text.chars().count();
        flat.push_str(&text);
        fragments.push(Fragment {
            index: fragments.len() as u32,
            doc: doc.clone(),
            page: b.page,
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            text,
            start_index: offset,
            length,
        });
        offset += length;
    }

    (fragments, flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageInfo;

    fn boxed(text: &str) -> RawBox {
        RawBox {
            page: PageInfo::new(1, 600.0, 800.0),
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            text: text.to_string(),
        }
    }

    fn doc() -> DocumentRef {
        DocumentRef::new(0, "a.pdf")
    }

    #[test]
    fn test_space_separators() {
        let (fragments, flat) = serialize_boxes(&doc(), vec![boxed("hello"), boxed("world")]);
        assert_eq!(flat, "hello world ");
        assert_eq!(fragments[0].start_index, 0);
        assert_eq!(fragments[0].length, 6);
        assert_eq!(fragments[1].start_index, 6);
        assert_eq!(fragments[1].length, 6);
    }

    #[test]
    fn test_soft_hyphen_joins_without_space() {
        let (fragments, flat) =
            serialize_boxes(&doc(), vec![boxed(&format!("base{SOFT_HYPHEN}")), boxed("ball")]);
        assert_eq!(flat, "baseball ");
        assert_eq!(fragments[0].text, "base");
        assert_eq!(fragments[1].start_index, 4);
    }

    #[test]
    fn test_roundtrip_concat_equals_flat() {
        let (fragments, flat) = serialize_boxes(
            &doc(),
            vec![
                boxed("  padded  "),
                boxed(&format!("hy{SOFT_HYPHEN}")),
                boxed("phen"),
                boxed("tail"),
            ],
        );
        let concat: String = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(concat, flat);
        assert_eq!(flat, "padded hyphen tail ");
    }

    #[test]
    fn test_char_counted_offsets() {
        // Multi-byte characters count as one.
        let (fragments, flat) = serialize_boxes(&doc(), vec![boxed("héllo"), boxed("wörld")]);
        assert_eq!(flat.chars().count(), 12);
        assert_eq!(fragments[1].start_index, 6);
        assert_eq!(fragments[1].length, 6);
    }

    #[test]
    fn test_indexes_sequential() {
        let (fragments, _) = serialize_boxes(&doc(), vec![boxed("a"), boxed("b"), boxed("c")]);
        let indexes: Vec<u32> = fragments.iter().map(|f| f.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }
}
