use super::types::{escape_like, OrderTerm, Param};

pub struct FilterOrder;

impl FilterOrder {
    /// Compile order terms; ranking terms bind their comparison value as a
    /// parameter numbered after `starting_param_index`.
    pub fn generate(terms: &[OrderTerm], starting_param_index: usize) -> (String, Vec<Param>) {
        if terms.is_empty() {
            return (String::new(), vec![]);
        }

        let mut params = Vec::new();
        let mut index = starting_param_index;
        let parts: Vec<String> = terms
            .iter()
            .map(|term| match term {
                OrderTerm::Column(column, sort) if column.is_text() => {
                    format!("LOWER({}) COLLATE \"C\" {}", column.to_sql(), sort.to_sql())
                }
                OrderTerm::Column(column, sort) => format!("{} {}", column.to_sql(), sort.to_sql()),
                OrderTerm::ExactMatch(column, value) => {
                    params.push(Param::Text(value.clone()));
                    index += 1;
                    format!("LOWER({}) = LOWER(${}) DESC", column.to_sql(), index)
                }
                OrderTerm::PrefixMatch(column, value) => {
                    params.push(Param::Text(format!("{}%", escape_like(value))));
                    index += 1;
                    format!("{} ILIKE ${} DESC", column.to_sql(), index)
                }
            })
            .collect();

        (format!("ORDER BY {}", parts.join(", ")), params)
    }
}
