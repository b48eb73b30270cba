use unicode_general_category::{get_general_category, GeneralCategory};

// Khmer Unicode block plus the symbol block used for lunar dates etc.
pub const KHMER_START: char = '\u{1780}';
pub const KHMER_END: char = '\u{17FF}';
pub const KHMER_SYMBOLS_START: char = '\u{19E0}';
pub const KHMER_SYMBOLS_END: char = '\u{19FF}';

pub const COENG: char = '\u{17D2}';
pub const RO: char = '\u{179A}';
pub const TA: char = '\u{178F}';
pub const DA: char = '\u{178A}';
pub const REPETITION_MARK: char = '\u{17D7}';
pub const CURRENCY_RIEL: char = '\u{17DB}';
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

pub fn is_khmer_char(c: char) -> bool {
    let code = c as u32;
    (0x1780..=0x17FF).contains(&code) || (0x19E0..=0x19FF).contains(&code)
}

pub fn is_consonant(c: char) -> bool {
    ('\u{1780}'..='\u{17A2}').contains(&c)
}

pub fn is_independent_vowel(c: char) -> bool {
    ('\u{17A3}'..='\u{17B3}').contains(&c)
}

pub fn is_dependent_vowel(c: char) -> bool {
    ('\u{17B6}'..='\u{17C5}').contains(&c)
}

pub fn is_sign(c: char) -> bool {
    ('\u{17C6}'..='\u{17D1}').contains(&c) || c == '\u{17D3}' || c == '\u{17DD}'
}

pub fn is_coeng(c: char) -> bool {
    c == COENG
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('\u{17E0}'..='\u{17E9}').contains(&c)
}

pub fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '\u{17DB}' | '€' | '£' | '¥')
}

/// Separators split text cheaply in the DP. Khmer punctuation, the Riel
/// sign, and anything Unicode files under Punctuation (P*), Symbol (S*) or
/// Separator (Z*) all qualify.
pub fn is_separator(c: char) -> bool {
    if ('\u{17D4}'..='\u{17DA}').contains(&c) || c == CURRENCY_RIEL {
        return true;
    }
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
            | GeneralCategory::MathSymbol
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::OtherSymbol
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

// Base consonants and independent vowels may legitimately stand alone as
// one-character words; every other single code point is suspect.
pub fn is_valid_single_word(c: char) -> bool {
    is_consonant(c) || is_independent_vowel(c)
}
