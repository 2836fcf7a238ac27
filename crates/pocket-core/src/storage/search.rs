//! Search term parsing shared by the storage engines.

/// A parsed search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// Empty term: every note matches
    All,
    /// Every token must prefix-match a word of the name or description
    Tokens(Vec<String>),
    /// Non-empty term without any searchable token: nothing matches
    Nothing,
}

impl SearchFilter {
    /// Split a user term into lowercase alphanumeric tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use pocket_core::storage::SearchFilter;
    ///
    /// assert_eq!(SearchFilter::parse("  "), SearchFilter::All);
    /// assert_eq!(
    ///     SearchFilter::parse("Shopping-list 2024"),
    ///     SearchFilter::Tokens(vec!["shopping".into(), "list".into(), "2024".into()])
    /// );
    /// assert_eq!(SearchFilter::parse("***"), SearchFilter::Nothing);
    /// ```
    pub fn parse(term: &str) -> Self {
        if term.trim().is_empty() {
            return SearchFilter::All;
        }

        let tokens: Vec<String> = term
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(|token| token.to_lowercase())
            .collect();

        if tokens.is_empty() {
            SearchFilter::Nothing
        } else {
            SearchFilter::Tokens(tokens)
        }
    }

    /// FTS5 MATCH expression restricted to the name and description columns.
    ///
    /// Returns `None` for [`SearchFilter::All`] and [`SearchFilter::Nothing`].
    pub fn fts_expression(&self) -> Option<String> {
        match self {
            SearchFilter::Tokens(tokens) => Some(
                tokens
                    .iter()
                    .map(|token| format!("{{name description}} : \"{}\"*", token))
                    .collect::<Vec<_>>()
                    .join(" AND "),
            ),
            SearchFilter::All | SearchFilter::Nothing => None,
        }
    }

    /// Whether a name/description pair matches, by word-prefix comparison.
    pub fn matches(&self, name: &str, description: &str) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Nothing => false,
            SearchFilter::Tokens(tokens) => {
                let words: Vec<String> = name
                    .split(|c: char| !c.is_alphanumeric())
                    .chain(description.split(|c: char| !c.is_alphanumeric()))
                    .filter(|word| !word.is_empty())
                    .map(|word| word.to_lowercase())
                    .collect();
                tokens
                    .iter()
                    .all(|token| words.iter().any(|word| word.starts_with(token.as_str())))
            }
        }
    }
}
