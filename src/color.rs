use rgb::RGB8;

use crate::gene::Gene;

pub const GRAY: RGB8 = RGB8 { r: 128, g: 128, b: 128 };
pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
/// Fill used for selected arrows.
pub const HIGHLIGHT: RGB8 = RGB8 { r: 255, g: 0, b: 0 };

/// Annotation sources carrying a COG category, newest first.
pub const CATEGORY_SOURCES: [&str; 2] = ["COG20_CATEGORY", "COG14_CATEGORY"];

const fn rgb(r: u8, g: u8, b: u8) -> RGB8 {
    RGB8 { r, g, b }
}

// COG functional category letter to fill color
const COG_COLORS: &[(char, RGB8)] = &[
    ('A', rgb(255, 165, 0)),   // orange
    ('B', rgb(205, 133, 63)),  // peru
    ('C', rgb(70, 130, 180)),  // steelblue
    ('D', rgb(186, 85, 211)),  // mediumorchid
    ('E', rgb(154, 205, 50)),  // yellowgreen
    ('F', rgb(255, 215, 0)),   // gold
    ('G', rgb(46, 139, 87)),   // seagreen
    ('H', rgb(218, 112, 214)), // orchid
    ('I', rgb(0, 206, 209)),   // darkturquoise
    ('J', rgb(178, 34, 34)),   // firebrick
    ('K', rgb(255, 0, 0)),     // red
    ('L', rgb(255, 105, 180)), // hotpink
    ('M', rgb(0, 128, 0)),     // green
    ('N', rgb(135, 206, 235)), // skyblue
    ('O', rgb(128, 0, 128)),   // purple
    ('P', rgb(0, 0, 205)),     // mediumblue
    ('Q', rgb(139, 69, 19)),   // saddlebrown
    ('R', rgb(192, 192, 192)), // silver
    ('S', rgb(211, 211, 211)), // lightgray
    ('T', rgb(255, 127, 80)),  // coral
    ('U', rgb(72, 61, 139)),   // darkslateblue
    ('V', rgb(220, 20, 60)),   // crimson
    ('W', rgb(95, 158, 160)),  // cadetblue
    ('X', rgb(240, 230, 140)), // khaki
    ('Y', rgb(0, 100, 0)),     // darkgreen
    ('Z', rgb(112, 128, 144)), // slategray
];

pub fn category_color(code: char) -> Option<RGB8> {
    COG_COLORS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, color)| color)
}

/// The COG category letter of a gene, taken from the newest annotation
/// source present. Multi-category codes resolve to their first letter.
pub fn category(gene: &Gene) -> Option<char> {
    let functions = gene.functions.as_ref()?;
    CATEGORY_SOURCES
        .iter()
        .find_map(|src| functions.get(*src))
        .and_then(|hit| hit.code().chars().next())
}

/// Arrow fill for a gene. Never fails: unannotated genes and unknown
/// categories are gray.
pub fn resolve_color(gene: &Gene) -> RGB8 {
    category(gene).and_then(category_color).unwrap_or(GRAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::Direction;
    use rstest::rstest;

    fn gene() -> Gene {
        Gene::new(1, Direction::Forward, 0, 10)
    }

    #[test]
    fn unannotated_is_gray() {
        assert_eq!(resolve_color(&gene()), GRAY);
    }

    #[rstest]
    #[case("COG14_CATEGORY", "K", rgb(255, 0, 0))]
    #[case("COG14_CATEGORY", "C", rgb(70, 130, 180))]
    #[case("COG20_CATEGORY", "M", rgb(0, 128, 0))]
    #[case("COG20_CATEGORY", "E!!!G", rgb(154, 205, 50))]
    #[case("COG14_CATEGORY", "?", GRAY)]
    #[case("COG14_CATEGORY", "", GRAY)]
    #[case("KEGG_Class", "K", GRAY)]
    fn resolves_category(#[case] source: &str, #[case] code: &str, #[case] expected: RGB8) {
        let g = gene().with_function(source, code, code, 0.0);
        assert_eq!(resolve_color(&g), expected);
    }

    #[test]
    fn newer_source_wins() {
        let g = gene()
            .with_function("COG14_CATEGORY", "K", "K", 0.0)
            .with_function("COG20_CATEGORY", "A", "A", 0.0);
        assert_eq!(category(&g), Some('A'));
        assert_eq!(resolve_color(&g), rgb(255, 165, 0));
    }
}
