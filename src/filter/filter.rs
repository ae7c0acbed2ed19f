use std::cmp::Ordering;

use super::error::FilterError;
use super::evaluate::Filterable;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{Column, OrderTerm, Page, Param, Predicate, SortDirection, SqlResult, Table};

/// A typed read query: base table, predicates, ordering and an optional page.
///
/// The row query and the count query are both derived from the same predicate
/// list, so they cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    table: Table,
    predicates: Vec<Predicate>,
    order: Vec<OrderTerm>,
    page: Option<Page>,
}

impl Filter {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            predicates: vec![],
            order: vec![],
            page: None,
        }
    }

    pub fn where_eq(mut self, column: Column, value: impl Into<Param>) -> Self {
        self.predicates.push(Predicate::Eq(column, value.into()));
        self
    }

    pub fn where_contains(mut self, columns: &[Column], needle: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Contains(columns.to_vec(), needle.into()));
        self
    }

    pub fn where_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, column: Column, sort: SortDirection) -> Self {
        self.order.push(OrderTerm::Column(column, sort));
        self
    }

    pub fn order_exact_first(mut self, column: Column, value: impl Into<String>) -> Self {
        self.order.push(OrderTerm::ExactMatch(column, value.into()));
        self
    }

    pub fn order_prefix_first(mut self, column: Column, value: impl Into<String>) -> Self {
        self.order.push(OrderTerm::PrefixMatch(column, value.into()));
        self
    }

    pub fn limit(mut self, limit: i64, offset: i64) -> Result<Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        if offset < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); }
        self.page = Some(Page { limit, offset });
        Ok(self)
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order_terms(&self) -> &[OrderTerm] {
        &self.order
    }

    pub fn page(&self) -> Option<Page> {
        self.page
    }

    /// Every referenced column must live on the filter's table
    pub fn validate(&self) -> Result<(), FilterError> {
        let columns = self
            .predicates
            .iter()
            .flat_map(|p| p.columns())
            .chain(self.order.iter().map(|o| o.column()));
        for column in columns {
            if column.table() != self.table {
                return Err(FilterError::foreign(column, self.table));
            }
        }
        Ok(())
    }

    /// Full row query. `select` and `from` come from the caller so it can join
    /// extra columns in; `from` must alias the filter table with `Table::alias`.
    pub fn to_sql(&self, select: &str, from: &str) -> Result<SqlResult, FilterError> {
        self.validate()?;
        let (where_clause, mut params) = FilterWhere::generate(&self.predicates, 0)?;
        let (order_clause, order_params) = FilterOrder::generate(&self.order, params.len());
        params.extend(order_params);
        let limit_clause = self.build_limit_clause(&mut params);

        let query = [
            format!("SELECT {}", select),
            format!("FROM {}", from),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_where_sql(&self) -> Result<SqlResult, FilterError> {
        self.validate()?;
        let (where_clause, params) = FilterWhere::generate(&self.predicates, 0)?;
        Ok(SqlResult { query: where_clause, params })
    }

    /// Count of every row the predicates match, ignoring order and page
    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let query = format!("SELECT COUNT(*) AS count FROM {} WHERE {}", self.table.from_sql(), where_result.query);
        Ok(SqlResult { query, params: where_result.params })
    }

    fn build_limit_clause(&self, params: &mut Vec<Param>) -> String {
        match self.page {
            Some(Page { limit, offset }) => {
                params.push(Param::Int(limit));
                params.push(Param::Int(offset));
                format!("LIMIT ${} OFFSET ${}", params.len() - 1, params.len())
            }
            None => String::new(),
        }
    }

    pub fn matches<R: Filterable>(&self, row: &R) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    pub fn compare<R: Filterable>(&self, a: &R, b: &R) -> Ordering {
        self.order
            .iter()
            .fold(Ordering::Equal, |acc, term| acc.then_with(|| term.compare(a, b)))
    }

    /// Evaluate the filter over in-memory rows: match, sort, then page
    pub fn apply<R: Filterable>(&self, rows: impl IntoIterator<Item = R>) -> Vec<R> {
        let mut matched: Vec<R> = rows.into_iter().filter(|r| self.matches(r)).collect();
        matched.sort_by(|a, b| self.compare(a, b));
        match self.page {
            Some(Page { limit, offset }) => matched
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect(),
            None => matched,
        }
    }

    pub fn count<'a, R: Filterable + 'a>(&self, rows: impl IntoIterator<Item = &'a R>) -> i64 {
        rows.into_iter().filter(|r| self.matches(*r)).count() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_search() -> Filter {
        Filter::new(Table::FlashcardSets)
            .where_eq(Column::OwnerId, 7i64)
            .where_contains(&[Column::Title], "bio")
            .order_exact_first(Column::Title, "bio")
            .order_prefix_first(Column::Title, "bio")
            .order_by(Column::LastUpdated, SortDirection::Desc)
            .limit(9, 9)
            .unwrap()
    }

    #[test]
    fn row_query_numbers_where_then_order_then_page() {
        let sql = owner_search().to_sql("s.*", "\"flashcard_sets\" s").unwrap();
        assert_eq!(
            sql.query,
            "SELECT s.* FROM \"flashcard_sets\" s WHERE s.\"owner_id\" = $1 AND s.\"title\" ILIKE $2 \
             ORDER BY LOWER(s.\"title\") = LOWER($3) DESC, s.\"title\" ILIKE $4 DESC, s.\"last_updated\" DESC \
             LIMIT $5 OFFSET $6"
        );
        assert_eq!(sql.params.len(), 6);
        assert_eq!(sql.params[4], Param::Int(9));
        assert_eq!(sql.params[5], Param::Int(9));
    }

    #[test]
    fn count_query_shares_predicates_only() {
        let filter = owner_search();
        let count = filter.to_count_sql().unwrap();
        assert_eq!(
            count.query,
            "SELECT COUNT(*) AS count FROM \"flashcard_sets\" s WHERE s.\"owner_id\" = $1 AND s.\"title\" ILIKE $2"
        );
        let rows = filter.to_sql("s.*", "\"flashcard_sets\" s").unwrap();
        assert_eq!(count.params[..], rows.params[..2]);
    }

    #[test]
    fn foreign_columns_are_rejected() {
        let filter = Filter::new(Table::Flashcards).where_eq(Column::OwnerId, 1i64);
        assert!(matches!(filter.to_count_sql(), Err(FilterError::ForeignColumn { .. })));
    }

    #[test]
    fn negative_page_is_rejected() {
        assert!(Filter::new(Table::Flashcards).limit(-1, 0).is_err());
        assert!(Filter::new(Table::Flashcards).limit(10, -10).is_err());
    }

    #[test]
    fn unpaged_query_has_no_limit() {
        let sql = Filter::new(Table::Flashcards)
            .where_eq(Column::CardSetId, 3i64)
            .order_by(Column::CardId, SortDirection::Asc)
            .to_sql("c.*", "\"flashcards\" c")
            .unwrap();
        assert!(!sql.query.contains("LIMIT"));
        assert_eq!(sql.params, vec![Param::Int(3)]);
    }
}
