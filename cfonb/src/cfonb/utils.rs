/// Длина записи CFONB 120
pub(super) const RECORD_LEN: usize = 120;
/// Допустимая длина с лишним завершающим символом (обычно '\r' от CRLF)
pub(super) const RECORD_LEN_WITH_FILLER: usize = 121;

/// Строка фиксированной ширины, адресуемая по символам, а не по байтам UTF-8
pub(super) struct FixedLine {
    chars: Vec<char>,
}

impl FixedLine {
    pub(super) fn new(line: &str) -> Self {
        FixedLine {
            chars: line.chars().collect(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.chars.len()
    }

    /// Символы [start, end), как есть
    pub(super) fn field(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Символы [start, end) без пробелов по краям
    pub(super) fn trimmed(&self, start: usize, end: usize) -> String {
        self.field(start, end).trim().to_string()
    }
}

/// Символы windows-1252 для байтов 0x80..=0x9F.
///
/// Неназначенные байты (0x81, 0x8D, 0x8F, 0x90, 0x9D) остаются управляющими символами C1.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Декодирует "latin1" в смысле браузеров, то есть windows-1252: каждый байт - ровно один символ
pub(super) fn decode_latin1(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
            _ => char::from(b),
        })
        .collect()
}
