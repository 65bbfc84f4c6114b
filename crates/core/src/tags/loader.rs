//! Keyword CSV parsing.

/// Parse `name,id` rows. The first line is a header and is skipped, as are
/// rows without a numeric id.
pub fn parse_keywords_csv(content: &str) -> Vec<(String, u32)> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let (name, id) = line.rsplit_once(',')?;
            let name = name.trim().trim_matches('"').trim();
            let id = id.trim().parse::<u32>().ok()?;
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), id))
        })
        .collect()
}
