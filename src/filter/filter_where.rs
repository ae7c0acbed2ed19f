use super::error::FilterError;
use super::types::{escape_like, Param, Predicate};

/// Compiles predicates into a WHERE body, numbering placeholders as it goes
pub struct FilterWhere {
    param_values: Vec<Param>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(predicates: &[Predicate], starting_param_index: usize) -> Result<(String, Vec<Param>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(predicates)
    }

    fn build(&mut self, predicates: &[Predicate]) -> Result<(String, Vec<Param>), FilterError> {
        let mut sql_conditions = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            sql_conditions.push(self.build_sql_condition(predicate)?);
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, std::mem::take(&mut self.param_values)))
    }

    fn build_sql_condition(&mut self, predicate: &Predicate) -> Result<String, FilterError> {
        Ok(match predicate {
            Predicate::Eq(column, value) => {
                let p = self.push_param(value.clone());
                format!("{} = {}", column.to_sql(), p)
            }
            Predicate::Contains(columns, needle) => {
                if columns.is_empty() {
                    return Err(FilterError::EmptyColumnList);
                }
                // One placeholder shared by every column
                let p = self.push_param(Param::Text(format!("%{}%", escape_like(needle))));
                let mut parts: Vec<String> = columns.iter().map(|c| format!("{} ILIKE {}", c.to_sql(), p)).collect();
                if parts.len() == 1 {
                    parts.swap_remove(0)
                } else {
                    format!("({})", parts.join(" OR "))
                }
            }
            Predicate::Lt(column, value) => {
                let p = self.push_param(Param::Int(*value));
                format!("{} < {}", column.to_sql(), p)
            }
            Predicate::Gte(column, value) => {
                let p = self.push_param(Param::Int(*value));
                format!("{} >= {}", column.to_sql(), p)
            }
        })
    }

    fn push_param(&mut self, value: Param) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
