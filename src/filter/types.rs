use std::fmt;

/// Tables the query layer reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    FlashcardSets,
    Flashcards,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::FlashcardSets => "flashcard_sets",
            Table::Flashcards => "flashcards",
        }
    }

    /// Alias every compiled column is qualified with
    pub fn alias(&self) -> &'static str {
        match self {
            Table::FlashcardSets => "s",
            Table::Flashcards => "c",
        }
    }

    pub fn from_sql(&self) -> String {
        format!("\"{}\" {}", self.name(), self.alias())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Filterable / sortable columns. Anything not listed here cannot reach SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    SetId,
    Title,
    OwnerId,
    Visibility,
    NumCards,
    LastUpdated,
    CardId,
    CardSetId,
    Term,
    Definition,
}

impl Column {
    pub fn table(&self) -> Table {
        match self {
            Column::SetId
            | Column::Title
            | Column::OwnerId
            | Column::Visibility
            | Column::NumCards
            | Column::LastUpdated => Table::FlashcardSets,
            Column::CardId | Column::CardSetId | Column::Term | Column::Definition => Table::Flashcards,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Column::SetId => "set_id",
            Column::Title => "title",
            Column::OwnerId => "owner_id",
            Column::Visibility => "visibility",
            Column::NumCards => "num_cards",
            Column::LastUpdated => "last_updated",
            Column::CardId => "flashcard_id",
            Column::CardSetId => "set_id",
            Column::Term => "term",
            Column::Definition => "definition",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Column::Title | Column::Visibility | Column::Term | Column::Definition)
    }

    /// Alias-qualified column reference, e.g. `s."title"`
    pub fn to_sql(&self) -> String {
        format!("{}.\"{}\"", self.table().alias(), self.name())
    }
}

/// Bound parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Int(i64),
    Text(String),
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(Column, Param),
    /// Case-insensitive substring match against any of the columns
    Contains(Vec<Column>, String),
    Lt(Column, i64),
    Gte(Column, i64),
}

impl Predicate {
    pub fn columns(&self) -> Vec<Column> {
        match self {
            Predicate::Eq(c, _) | Predicate::Lt(c, _) | Predicate::Gte(c, _) => vec![*c],
            Predicate::Contains(cols, _) => cols.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderTerm {
    /// Text columns sort case-insensitively by code point, independent of the
    /// database collation
    Column(Column, SortDirection),
    /// Rows whose column equals the value (case-insensitively) sort first
    ExactMatch(Column, String),
    /// Rows whose column starts with the value (case-insensitively) sort first
    PrefixMatch(Column, String),
}

impl OrderTerm {
    pub fn column(&self) -> Column {
        match self {
            OrderTerm::Column(c, _) | OrderTerm::ExactMatch(c, _) | OrderTerm::PrefixMatch(c, _) => *c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Param>,
}

/// Escape LIKE metacharacters so user input only ever matches literally
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
