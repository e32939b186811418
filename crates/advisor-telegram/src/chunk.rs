// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splitting long replies into messages that fit Telegram's length limit.

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Breaks at line boundaries where possible; a single line longer than the
/// limit is cut at character boundaries. Text that already fits is returned
/// as-is in a single chunk.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max_chars && !current.is_empty() {
            push_chunk(&mut chunks, &mut current);
            current_len = 0;
        }

        if line_len > max_chars {
            for ch in line.chars() {
                if current_len == max_chars {
                    push_chunk(&mut chunks, &mut current);
                    current_len = 0;
                }
                current.push(ch);
                current_len += 1;
            }
        } else {
            current.push_str(line);
            current_len += line_len;
        }
    }
    push_chunk(&mut chunks, &mut current);
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, current: &mut String) {
    let chunk = std::mem::take(current);
    let chunk = chunk.trim_end_matches('\n');
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}
