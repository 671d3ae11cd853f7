use tracing::{debug, trace};

use crate::types::{Block, BlockKind, Bounds, FontSize, PageRect, Part, TextFragment};
use crate::utils::round_half_up;

/// Which fragments count as body text, judged against the document [`Bounds`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnFilter {
    /// Drop fragments starting left of the dominant left edge.
    #[default]
    LeftEdge,
    /// Also drop fragments starting right of the dominant right edge.
    LeftAndRightEdge,
}

impl ColumnFilter {
    pub fn accepts(&self, fragment: &TextFragment, bounds: &Bounds) -> bool {
        let x = fragment.x();
        if bounds.left.is_some_and(|left| x < left as f64) {
            return false;
        }
        match self {
            ColumnFilter::LeftEdge => true,
            ColumnFilter::LeftAndRightEdge => !bounds.right.is_some_and(|right| x > right as f64),
        }
    }
}

/// Rolling state describing the last accepted fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Rounded right edge.
    pub x: i64,
    /// Rounded bottom edge.
    pub y: i64,
    pub font_size: FontSize,
    pub text: String,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            x: 0,
            y: 0,
            font_size: Some(0),
            text: String::new(),
        }
    }
}

impl Cursor {
    pub fn after(fragment: &TextFragment, font_size: FontSize) -> Cursor {
        Cursor {
            x: round_half_up(fragment.rect.max_x()),
            y: round_half_up(fragment.rect.max_y()),
            font_size,
            text: fragment.text.clone(),
        }
    }

    fn is_above(&self, rect: &PageRect) -> bool {
        round_half_up(rect.origin.y) > self.y
    }
}

fn size_changed(current: FontSize, previous: FontSize) -> bool {
    match (current, previous) {
        (Some(a), Some(b)) => a != b,
        _ => true,
    }
}

fn size_increased(current: FontSize, previous: FontSize) -> bool {
    matches!((current, previous), (Some(a), Some(b)) if a > b)
}

/// Decide whether a space goes between the cursor's fragment and one at `rect`.
///
/// A horizontal gap always gets a space. Moving down a line gets one too,
/// unless the previous text ended in a hyphen, in which case the word carries
/// on without a break. Anything else is treated as the same word.
pub fn should_add_space(rect: &PageRect, cursor: &Cursor) -> bool {
    if round_half_up(rect.origin.x) > cursor.x {
        return true;
    }

    if cursor.is_above(rect) {
        return !cursor.text.ends_with('-');
    }

    false
}

/// Accumulator for one reconstruction pass.
///
/// Each [`BlockOutput::step`] consumes the state and one fragment and returns
/// the next state, so a pass is a plain fold over the fragments.
#[derive(Debug, Clone)]
pub struct BlockOutput {
    cursor: Cursor,
    block: Block,
    blocks: Vec<Block>,
}

impl Default for BlockOutput {
    fn default() -> Self {
        BlockOutput {
            cursor: Cursor::default(),
            block: Block::initial(),
            blocks: Vec::new(),
        }
    }
}

impl BlockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn open_block(&self) -> &Block {
        &self.block
    }

    pub fn sealed_blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn step(mut self, fragment: &TextFragment, bounds: &Bounds, filter: ColumnFilter) -> Self {
        if !filter.accepts(fragment, bounds) {
            trace!("outside column {}: {}", bounds, fragment);
            return self;
        }

        let font_size = fragment.font_size();

        if self.cursor.is_above(&fragment.rect) && size_changed(font_size, self.cursor.font_size) {
            let kind = if size_increased(font_size, self.cursor.font_size) {
                BlockKind::Heading
            } else {
                BlockKind::Paragraph
            };
            trace!("new {} at size {:?}: {}", kind, font_size, fragment);

            let next = Block::opened_by(kind, font_size, &fragment.text);
            self.seal(next);
        } else {
            if should_add_space(&fragment.rect, &self.cursor) {
                self.block.parts.push(Part::Separator);
            }
            self.block.parts.push(Part::Text(fragment.text.clone()));
        }

        self.cursor = Cursor::after(fragment, font_size);
        self
    }

    fn seal(&mut self, next: Block) {
        let sealed = std::mem::replace(&mut self.block, next);
        if sealed.is_empty() {
            return;
        }
        debug!(
            "sealed {} block ({} parts): {:?}",
            sealed.kind,
            sealed.parts.len(),
            sealed.text()
        );
        self.blocks.push(sealed);
    }

    /// Close the pass. The open block is always kept, even when empty.
    pub fn finish(mut self) -> Vec<Block> {
        self.blocks.push(self.block);
        self.blocks
    }
}

/// Group `fragments` into heading and paragraph blocks, filtering on the left edge.
pub fn reconstruct(fragments: &[TextFragment], bounds: &Bounds) -> Vec<Block> {
    reconstruct_with(fragments, bounds, ColumnFilter::default())
}

pub fn reconstruct_with(
    fragments: &[TextFragment],
    bounds: &Bounds,
    filter: ColumnFilter,
) -> Vec<Block> {
    let blocks = fragments
        .iter()
        .fold(BlockOutput::new(), |output, fragment| {
            output.step(fragment, bounds, filter)
        })
        .finish();
    debug!("{} fragments -> {} blocks", fragments.len(), blocks.len());
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            left: Some(0),
            right: Some(100),
            font_size: Some(12),
        }
    }

    fn text(s: &str) -> Part {
        Part::Text(s.to_owned())
    }

    fn cursor(x: i64, y: i64, font_size: FontSize, text: &str) -> Cursor {
        Cursor {
            x,
            y,
            font_size,
            text: text.to_owned(),
        }
    }

    #[test_log::test]
    fn space_after_horizontal_gap() {
        let rect = euclid::rect(55.0, 0.0, 40.0, 10.0);
        assert!(should_add_space(&rect, &cursor(50, 10, Some(12), "Hello")));
    }

    #[test_log::test]
    fn no_space_for_adjacent_runs() {
        let rect = euclid::rect(50.2, 0.0, 10.0, 10.0);
        assert!(!should_add_space(&rect, &cursor(50, 10, Some(12), "Hel")));
    }

    #[test_log::test]
    fn space_after_wrapped_line() {
        let rect = euclid::rect(0.0, 12.0, 40.0, 10.0);
        assert!(should_add_space(&rect, &cursor(90, 10, Some(12), "end")));
    }

    #[test_log::test]
    fn no_space_after_hyphenated_line_end() {
        let rect = euclid::rect(0.0, 12.0, 40.0, 10.0);
        let hyphenated = cursor(90, 10, Some(12), "hyphen-");
        assert!(!should_add_space(&rect, &hyphenated));
        // the hyphen has to be the last character
        let prefixed = cursor(90, 10, Some(12), "-prefix");
        assert!(should_add_space(&rect, &prefixed));
    }

    #[test_log::test]
    fn horizontal_gap_wins_over_hyphen() {
        let rect = euclid::rect(95.0, 12.0, 5.0, 10.0);
        let hyphenated = cursor(90, 10, Some(12), "hyphen-");
        assert!(should_add_space(&rect, &hyphenated));
    }

    #[test_log::test]
    fn same_line_fragments_join_with_space() {
        let fragments = vec![
            TextFragment::new(0.0, 0.0, 50.0, 10.0, "12px", "Hello"),
            TextFragment::new(55.0, 0.0, 40.0, 10.0, "12px", "world"),
        ];
        let blocks = reconstruct(&fragments, &bounds());
        assert_eq!(
            blocks,
            vec![Block {
                kind: BlockKind::Paragraph,
                font_size: None,
                parts: vec![text("Hello"), Part::Separator, text("world")],
            }]
        );
    }

    #[test_log::test]
    fn first_fragment_at_top_stays_in_initial_block() {
        // y = 0 is not below the initial cursor, so no block is opened
        let fragments = vec![TextFragment::new(0.0, 0.0, 50.0, 10.0, "12px", "Top")];
        let blocks = reconstruct(&fragments, &bounds());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].font_size, None);
        assert_eq!(blocks[0].parts, vec![text("Top")]);
    }

    #[test_log::test]
    fn larger_font_on_new_line_opens_heading() {
        let fragments = vec![
            TextFragment::new(0.0, 0.0, 50.0, 10.0, "12px", "Intro"),
            TextFragment::new(0.0, 20.0, 80.0, 20.0, "20px", "Title"),
        ];
        let blocks = reconstruct(&fragments, &bounds());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].parts, vec![text("Intro")]);
        assert_eq!(
            blocks[1],
            Block {
                kind: BlockKind::Heading,
                font_size: Some(20),
                parts: vec![text("Title")],
            }
        );
    }

    #[test_log::test]
    fn smaller_font_on_new_line_opens_paragraph() {
        let fragments = vec![
            TextFragment::new(0.0, 5.0, 80.0, 20.0, "20px", "Title"),
            TextFragment::new(0.0, 30.0, 50.0, 10.0, "12px", "Body"),
            TextFragment::new(52.0, 30.0, 30.0, 10.0, "12px", "text"),
        ];
        let blocks = reconstruct(&fragments, &bounds());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Heading);
        assert_eq!(blocks[0].text(), "Title");
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(blocks[1].font_size, Some(12));
        assert_eq!(blocks[1].text(), "Body text");
    }

    #[test_log::test]
    fn size_change_on_same_line_continues_block() {
        let fragments = vec![
            TextFragment::new(0.0, 5.0, 40.0, 10.0, "12px", "Normal"),
            TextFragment::new(45.0, 5.0, 10.0, 6.0, "7px", "2"),
        ];
        let blocks = reconstruct(&fragments, &bounds());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "Normal 2");
    }

    #[test_log::test]
    fn empty_blocks_are_not_sealed() {
        // the opening fragment changes size on a new line while the initial
        // block is still empty, so only the trailing block is emitted
        let fragments = vec![TextFragment::new(0.0, 5.0, 40.0, 10.0, "12px", "Only")];
        let blocks = reconstruct(&fragments, &bounds());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Heading);
        assert_eq!(blocks[0].text(), "Only");
    }

    #[test_log::test]
    fn no_fragments_yield_single_empty_block() {
        let blocks = reconstruct(&[], &Bounds::default());
        assert_eq!(blocks, vec![Block::initial()]);
    }

    #[test_log::test]
    fn left_margin_fragments_are_dropped() {
        let bounds = Bounds {
            left: Some(72),
            right: Some(500),
            font_size: Some(12),
        };
        let fragments = vec![
            TextFragment::new(72.0, 5.0, 40.0, 10.0, "12px", "Body"),
            TextFragment::new(10.0, 5.0, 20.0, 10.0, "12px", "margin"),
            TextFragment::new(120.0, 5.0, 40.0, 10.0, "12px", "text"),
        ];
        let blocks = reconstruct(&fragments, &bounds);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "Body text");
    }

    #[test_log::test]
    fn right_edge_filter_is_opt_in() {
        let bounds = Bounds {
            left: Some(0),
            right: Some(100),
            font_size: Some(12),
        };
        let fragments = vec![
            TextFragment::new(0.0, 5.0, 40.0, 10.0, "12px", "Body"),
            TextFragment::new(150.0, 5.0, 20.0, 10.0, "12px", "aside"),
        ];

        let left_only = reconstruct_with(&fragments, &bounds, ColumnFilter::LeftEdge);
        assert_eq!(left_only[0].text(), "Body aside");

        let both = reconstruct_with(&fragments, &bounds, ColumnFilter::LeftAndRightEdge);
        assert_eq!(both[0].text(), "Body");
    }

    #[test_log::test]
    fn missing_bounds_filter_nothing() {
        let fragment = TextFragment::new(-50.0, 0.0, 10.0, 10.0, "12px", "x");
        assert!(ColumnFilter::LeftAndRightEdge.accepts(&fragment, &Bounds::default()));
    }

    #[test_log::test]
    fn hyphenated_line_break_joins_words() {
        let fragments = vec![
            TextFragment::new(0.0, 5.0, 90.0, 10.0, "12px", "a hyphen-"),
            TextFragment::new(0.0, 17.0, 40.0, 10.0, "12px", "ated word"),
        ];
        let blocks = reconstruct(&fragments, &bounds());
        assert_eq!(blocks[0].parts, vec![text("a hyphen-"), text("ated word")]);
        assert_eq!(blocks[0].text(), "a hyphen-ated word");
    }

    #[test_log::test]
    fn wrapped_line_gets_space() {
        let fragments = vec![
            TextFragment::new(0.0, 5.0, 90.0, 10.0, "12px", "first line"),
            TextFragment::new(0.0, 17.0, 40.0, 10.0, "12px", "second"),
        ];
        let blocks = reconstruct(&fragments, &bounds());
        assert_eq!(blocks[0].text(), "first line second");
    }

    #[test_log::test]
    fn unparseable_size_always_breaks_on_new_line() {
        let fragments = vec![
            TextFragment::new(0.0, 5.0, 40.0, 10.0, "12px", "Body"),
            TextFragment::new(0.0, 17.0, 40.0, 10.0, "bogus", "odd"),
            TextFragment::new(0.0, 29.0, 40.0, 10.0, "bogus", "odder"),
            TextFragment::new(0.0, 41.0, 40.0, 10.0, "12px", "back"),
        ];
        let blocks = reconstruct(&fragments, &bounds());
        let kinds: Vec<_> = blocks.iter().map(|b| (b.kind, b.font_size)).collect();
        assert_eq!(
            kinds,
            vec![
                (BlockKind::Heading, Some(12)),
                (BlockKind::Paragraph, None),
                (BlockKind::Paragraph, None),
                (BlockKind::Paragraph, Some(12)),
            ]
        );
    }

    #[test_log::test]
    fn cursor_tracks_rounded_far_edges() {
        let fragment = TextFragment::new(10.25, 20.4, 30.25, 9.6, "12px", "word-");
        let output = BlockOutput::new().step(&fragment, &bounds(), ColumnFilter::LeftEdge);
        assert_eq!(output.cursor(), &cursor(41, 30, Some(12), "word-"));
        assert!(output.sealed_blocks().is_empty());
        assert_eq!(output.open_block().text(), "word-");
    }

    #[test_log::test]
    fn filtered_fragment_leaves_state_untouched() {
        let bounds = Bounds {
            left: Some(50),
            right: None,
            font_size: None,
        };
        let fragment = TextFragment::new(10.0, 20.0, 30.0, 10.0, "12px", "note");
        let output = BlockOutput::new().step(&fragment, &bounds, ColumnFilter::LeftEdge);
        assert_eq!(output.cursor(), &Cursor::default());
        assert!(output.open_block().is_empty());
    }

    #[test_log::test]
    fn reconstruction_is_deterministic() {
        let fragments = vec![
            TextFragment::new(0.0, 5.0, 80.0, 20.0, "20px", "Title"),
            TextFragment::new(0.0, 30.0, 50.0, 10.0, "12px", "Body"),
            TextFragment::new(0.0, 42.0, 50.0, 10.0, "12px", "more-"),
            TextFragment::new(0.0, 54.0, 50.0, 10.0, "12px", "over"),
        ];
        assert_eq!(
            reconstruct(&fragments, &bounds()),
            reconstruct(&fragments, &bounds())
        );
    }
}
