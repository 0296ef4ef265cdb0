use super::model::Profile;

/// Parsed search box input: `+word` must match, `-word` must not match,
/// plain words are alternatives of which at least one must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTokens {
    pub required: Vec<String>,
    pub excluded: Vec<String>,
    pub optional: Vec<String>,
}

impl SearchTokens {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty() && self.optional.is_empty()
    }
}

pub fn parse_search_tokens(text: &str) -> SearchTokens {
    let mut tokens = SearchTokens::default();
    for token in text.split_whitespace() {
        if let Some(rest) = token.strip_prefix('+') {
            tokens.required.push(fold(rest));
        } else if let Some(rest) = token.strip_prefix('-') {
            tokens.excluded.push(fold(rest));
        } else {
            tokens.optional.push(fold(token));
        }
    }
    tokens
}

/// Filter state applied to the profile view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    pub tokens: SearchTokens,
    pub not_in_list_only: bool,
}

impl ProfileFilter {
    pub fn matches(&self, profile: &Profile) -> bool {
        if !self.tokens.is_empty() && !matches_tokens(profile, &self.tokens) {
            return false;
        }
        !(self.not_in_list_only && !profile.lists.is_empty())
    }

    /// Indices of `profiles` passing the filter, in display order.
    pub fn apply(&self, profiles: &[Profile]) -> Vec<usize> {
        profiles
            .iter()
            .enumerate()
            .filter(|(_, p)| self.matches(p))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Case folding shared by filtering and highlighting. Works per char so
/// highlight offsets line up with what the filter matched.
fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

fn searchable_text(profile: &Profile) -> String {
    fold(&format!(
        "{} {} {}",
        profile.handle,
        profile.display_name.as_deref().unwrap_or(""),
        profile.description.as_deref().unwrap_or("")
    ))
}

pub fn matches_tokens(profile: &Profile, tokens: &SearchTokens) -> bool {
    let text = searchable_text(profile);
    if tokens.excluded.iter().any(|t| text.contains(t.as_str())) {
        return false;
    }
    if !tokens.required.iter().all(|t| text.contains(t.as_str())) {
        return false;
    }
    tokens.optional.is_empty() || tokens.optional.iter().any(|t| text.contains(t.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    Required,
    Optional,
}

/// Split `text` into runs tagged with the kind of search term they match,
/// case-insensitively. Required terms win over optional ones starting at
/// the same position; longer terms win among equals.
pub fn highlight<'a>(
    text: &'a str,
    required: &[String],
    optional: &[String],
) -> Vec<(&'a str, Highlight)> {
    // Each folded char remembers the byte offset of the source char it came
    // from, so a match can be mapped back onto `text`.
    let folded: Vec<(usize, char)> = text
        .char_indices()
        .flat_map(|(i, c)| c.to_lowercase().map(move |l| (i, l)))
        .collect();
    let terms: Vec<(Vec<char>, Highlight)> = required
        .iter()
        .map(|t| (t, Highlight::Required))
        .chain(optional.iter().map(|t| (t, Highlight::Optional)))
        .map(|(t, kind)| (fold(t).chars().collect::<Vec<char>>(), kind))
        .filter(|(t, _)| !t.is_empty())
        .collect();

    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < folded.len() {
        let hit = terms
            .iter()
            .filter(|(term, _)| {
                folded.len() - pos >= term.len()
                    && folded[pos..pos + term.len()]
                        .iter()
                        .zip(term)
                        .all(|((_, c), t)| c == t)
            })
            .max_by_key(|(term, kind)| (*kind == Highlight::Required, term.len()));

        match hit {
            Some((term, kind)) => {
                let start = folded[pos].0.max(plain_start);
                // widen to the end of the last source char touched
                let last = folded[pos + term.len() - 1].0;
                let end = last + text[last..].chars().next().map_or(0, char::len_utf8);
                if plain_start < start {
                    spans.push((&text[plain_start..start], Highlight::None));
                }
                if start < end {
                    spans.push((&text[start..end], *kind));
                }
                plain_start = end.max(plain_start);
                pos += term.len();
                while pos < folded.len() && folded[pos].0 < plain_start {
                    pos += 1;
                }
            }
            None => pos += 1,
        }
    }

    if plain_start < text.len() {
        spans.push((&text[plain_start..], Highlight::None));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(handle: &str, name: Option<&str>, bio: Option<&str>) -> Profile {
        Profile {
            did: format!("did:plc:{}", handle),
            display_name: name.map(str::to_string),
            handle: handle.to_string(),
            avatar: None,
            description: bio.map(str::to_string),
            following: true,
            followed_by: false,
            lists: Vec::new(),
        }
    }

    #[test]
    fn test_parse_tokens_by_prefix() {
        let tokens = parse_search_tokens("  Developer +Engineer   -recruiter rust ");
        assert_eq!(tokens.required, vec!["engineer"]);
        assert_eq!(tokens.excluded, vec!["recruiter"]);
        assert_eq!(tokens.optional, vec!["developer", "rust"]);
        assert!(parse_search_tokens("   ").is_empty());
    }

    #[test]
    fn test_required_and_excluded_terms() {
        let dev = profile("dev.test", Some("Dev"), Some("Rust engineer, not a recruiter"));
        let tokens = parse_search_tokens("+engineer -recruiter");
        assert!(!matches_tokens(&dev, &tokens));

        let tokens = parse_search_tokens("+rust +engineer");
        assert!(matches_tokens(&dev, &tokens));

        let tokens = parse_search_tokens("+rust +golang");
        assert!(!matches_tokens(&dev, &tokens));
    }

    #[test]
    fn test_optional_terms_need_one_hit() {
        let p = profile("alice.test", None, Some("I draw cats"));
        assert!(matches_tokens(&p, &parse_search_tokens("dogs cats")));
        assert!(!matches_tokens(&p, &parse_search_tokens("dogs birds")));
        assert!(matches_tokens(&p, &parse_search_tokens("ALICE")));
    }

    #[test]
    fn test_missing_fields_still_searchable_by_handle() {
        let p = profile("bob.test", None, None);
        assert!(matches_tokens(&p, &parse_search_tokens("+bob")));
    }

    #[test]
    fn test_not_in_list_only_filter() {
        let mut listed = profile("a.test", None, None);
        listed.lists.push(crate::lists::model::ProfileList {
            name: "L".into(),
            uri: "at://me/app.bsky.graph.list/l".into(),
            item_uri: "at://me/app.bsky.graph.listitem/1".into(),
            item_rkey: "1".into(),
        });
        let unlisted = profile("b.test", None, None);
        let profiles = vec![listed, unlisted];

        let filter = ProfileFilter {
            tokens: SearchTokens::default(),
            not_in_list_only: true,
        };
        assert_eq!(filter.apply(&profiles), vec![1]);
        assert_eq!(ProfileFilter::default().apply(&profiles), vec![0, 1]);
    }

    #[test]
    fn test_highlight_marks_terms_case_insensitively() {
        let spans = highlight(
            "Rust and Go, mostly RUST",
            &["rust".to_string()],
            &["go".to_string()],
        );
        assert_eq!(
            spans,
            vec![
                ("Rust", Highlight::Required),
                (" and ", Highlight::None),
                ("Go", Highlight::Optional),
                (", mostly ", Highlight::None),
                ("RUST", Highlight::Required),
            ]
        );
    }

    #[test]
    fn test_highlight_prefers_required_at_same_position() {
        let spans = highlight("engineer", &["eng".to_string()], &["engineer".to_string()]);
        assert_eq!(spans, vec![("eng", Highlight::Required), ("ineer", Highlight::None)]);
    }

    #[test]
    fn test_highlight_without_terms_is_one_plain_span() {
        assert_eq!(highlight("häkeln", &[], &[]), vec![("häkeln", Highlight::None)]);
        assert!(highlight("", &["x".to_string()], &[]).is_empty());
    }

    #[test]
    fn test_highlight_agrees_with_filter_on_expanding_lowercase() {
        // 'İ' lowercases to two chars ("i" + combining dot)
        let p = profile("x.test", None, Some("İstanbul food"));
        let tokens = parse_search_tokens("+istanbul");
        assert!(!matches_tokens(&p, &tokens));
        let tokens = parse_search_tokens("+İstanbul");
        assert!(matches_tokens(&p, &tokens));

        let spans = highlight("İstanbul food", &tokens.required, &[]);
        assert_eq!(
            spans,
            vec![("İstanbul", Highlight::Required), (" food", Highlight::None)]
        );

        let spans = highlight("İstanbul food", &[], &["i\u{307}s".to_string()]);
        assert_eq!(spans, vec![("İs", Highlight::Optional), ("tanbul food", Highlight::None)]);
    }

    #[test]
    fn test_highlight_multibyte_text() {
        let spans = highlight("Café CAFÉ", &[], &["café".to_string()]);
        assert_eq!(
            spans,
            vec![
                ("Café", Highlight::Optional),
                (" ", Highlight::None),
                ("CAFÉ", Highlight::Optional),
            ]
        );
    }
}
