/// telegram's per-message ceiling, measured in UTF-16 code units
pub const MAX_MESSAGE_LENGTH: usize = 4096;

pub struct MessageFormatter;

impl MessageFormatter {
    /// counts UTF-16 code units as Telegram does for message length limits
    pub fn count_utf16_code_units(text: &str) -> usize {
        text.encode_utf16().count()
    }

    /// splits a reply into chunks of at most `max_length` UTF-16 code units.
    /// prefers line boundaries; a line that is too long on its own (a compact
    /// json dump, say) is cut at char boundaries. concatenating the chunks
    /// gives back the input unchanged.
    pub fn split_message_into_chunks(text: &str, max_length: usize) -> Vec<String> {
        if Self::count_utf16_code_units(text) <= max_length {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut current_chunk = String::new();
        let mut current_units = 0;

        for line in text.split_inclusive('\n') {
            let line_units = Self::count_utf16_code_units(line);

            if current_units + line_units <= max_length {
                current_chunk.push_str(line);
                current_units += line_units;
                continue;
            }

            if !current_chunk.is_empty() {
                chunks.push(std::mem::take(&mut current_chunk));
                current_units = 0;
            }

            if line_units <= max_length {
                current_chunk.push_str(line);
                current_units = line_units;
                continue;
            }

            for ch in line.chars() {
                let width = ch.len_utf16();
                if current_units + width > max_length && !current_chunk.is_empty() {
                    chunks.push(std::mem::take(&mut current_chunk));
                    current_units = 0;
                }
                current_chunk.push(ch);
                current_units += width;
            }
        }

        if !current_chunk.is_empty() {
            chunks.push(current_chunk);
        }

        chunks
    }
}
