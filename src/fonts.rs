//! Font metrics for the standard PDF fonts
//!
//! Text is drawn with one of the standard 14 fonts using WinAnsiEncoding, so
//! nothing is embedded. The width tables below are the AFM advance widths for
//! WinAnsi codes 32-255, in 1/1000ths of the em square.

use crate::error::{Error, Result};

/// Width and height measurement used by the layout engine
pub trait FontMetrics {
    /// Advance width of `text` set at `size` points
    fn measure_width(&self, text: &str, size: f32) -> f32;

    /// Height of a line (ascender to descender) at `size` points
    fn measure_height(&self, size: f32) -> f32;
}

/// Standard 14 fonts supported by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StandardFont {
    #[default]
    Helvetica,
    TimesRoman,
}

impl StandardFont {
    /// Name used for `/BaseFont` in the font dictionary
    pub fn base_font_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::TimesRoman => "Times-Roman",
        }
    }

    fn widths(&self) -> &'static [u16; 224] {
        match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::TimesRoman => &TIMES_ROMAN_WIDTHS,
        }
    }

    /// (ascender, descender) in 1/1000 em
    fn vertical_metrics(&self) -> (i32, i32) {
        match self {
            StandardFont::Helvetica => (718, -207),
            StandardFont::TimesRoman => (683, -217),
        }
    }

    /// Advance width of a single WinAnsi code in 1/1000 em
    pub fn glyph_width(&self, code: u8) -> u16 {
        if code < 32 {
            return 0;
        }
        self.widths()[(code - 32) as usize]
    }
}

impl FontMetrics for StandardFont {
    fn measure_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .iter()
            .map(|&code| self.glyph_width(code) as u32)
            .sum();
        units as f32 * size / 1000.0
    }

    fn measure_height(&self, size: f32) -> f32 {
        let (ascender, descender) = self.vertical_metrics();
        (ascender - descender) as f32 * size / 1000.0
    }
}

impl std::str::FromStr for StandardFont {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "helvetica" => Ok(StandardFont::Helvetica),
            "times-roman" | "times" => Ok(StandardFont::TimesRoman),
            other => Err(Error::invalid_setting(
                "font",
                format!("unsupported font '{}' (expected Helvetica or Times-Roman)", other),
            )),
        }
    }
}

/// Byte used for characters WinAnsiEncoding cannot represent
pub const REPLACEMENT_BYTE: u8 = b'?';

/// Map a character to its WinAnsiEncoding code, if it has one
fn win_ansi_code(c: char) -> Option<u8> {
    let code = match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(code)
}

/// Encode text as WinAnsi bytes, replacing unmappable characters with `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_code(c).unwrap_or(REPLACEMENT_BYTE))
        .collect()
}

/// Number of characters in `text` that WinAnsiEncoding cannot represent
pub fn count_unmappable(text: &str) -> usize {
    text.chars().filter(|&c| win_ansi_code(c).is_none()).count()
}

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 224] = [
    // 32-47: space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 48-63: 0-9 : ; < = > ?
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 64-79: @ A-O
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 80-95: P-Z [ \ ] ^ _
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 96-111: ` a-o
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 112-127: p-z { | } ~ DEL
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    // 128-143: Euro, quotes, ellipsis, daggers, Scaron, OE, Zcaron
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    // 144-159: curly quotes, bullet, dashes, trademark, scaron, oe, zcaron, Ydieresis
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    // 160-175
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 176-191
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 192-207: Agrave-Idieresis
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 208-223: Eth-germandbls
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 224-239: agrave-idieresis
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // 240-255: eth-ydieresis
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
static TIMES_ROMAN_WIDTHS: [u16; 224] = [
    // 32-47
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    // 48-63
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    // 64-79
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    // 80-95
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    // 96-111
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    // 112-127
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, 0,
    // 128-143
    500, 0, 333, 500, 444, 1000, 500, 500, 333, 1000, 556, 333, 889, 0, 611, 0,
    // 144-159
    0, 333, 333, 444, 444, 350, 500, 1000, 333, 980, 389, 333, 722, 0, 444, 722,
    // 160-175
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333,
    // 176-191
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
    // 192-207
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
    // 208-223
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500,
    // 224-239
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    // 240-255
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_width() {
        // O b s i d i a n = 778+556+500+222+556+222+556+556
        let width = StandardFont::Helvetica.measure_width("Obsidian", 70.0);
        assert!((width - 276.22).abs() < 0.01, "got {}", width);
    }

    #[test]
    fn test_times_width() {
        // H e l l o = 722+444+278+278+500
        let width = StandardFont::TimesRoman.measure_width("Hello", 10.0);
        assert!((width - 22.22).abs() < 0.01, "got {}", width);
    }

    #[test]
    fn test_width_scales_with_size() {
        let font = StandardFont::Helvetica;
        let small = font.measure_width("Scale me", 10.0);
        let large = font.measure_width("Scale me", 20.0);
        assert!((large - 2.0 * small).abs() < 0.001);
        assert_eq!(font.measure_width("", 12.0), 0.0);
    }

    #[test]
    fn test_heights() {
        assert!((StandardFont::Helvetica.measure_height(70.0) - 64.75).abs() < 0.001);
        assert!((StandardFont::TimesRoman.measure_height(10.0) - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Abc"), b"Abc".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("“hi” — ok…"), vec![0x93, b'h', b'i', 0x94, b' ', 0x97, b' ', b'o', b'k', 0x85]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
    }

    #[test]
    fn test_unmappable_measured_as_replacement() {
        let font = StandardFont::Helvetica;
        assert_eq!(font.measure_width("日", 10.0), font.measure_width("?", 10.0));
        assert_eq!(count_unmappable("ok 日本"), 2);
        assert_eq!(count_unmappable("naïve"), 0);
    }

    #[test]
    fn test_font_from_str() {
        assert_eq!("helvetica".parse::<StandardFont>().unwrap(), StandardFont::Helvetica);
        assert_eq!("Times-Roman".parse::<StandardFont>().unwrap(), StandardFont::TimesRoman);
        assert_eq!("times roman".parse::<StandardFont>().unwrap(), StandardFont::TimesRoman);
        assert!("Comic Sans".parse::<StandardFont>().is_err());
    }
}
