use super::value::Value;

/// Rows exactly as the store returned them, with source-native column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a row. Short rows are padded with NULL, extra cells dropped.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Rename columns according to `(from, to)` pairs.
    ///
    /// Names not in the mapping are left alone, so applying the same
    /// mapping twice is a no-op. A column whose target name is already
    /// taken keeps its own name. Returns how many columns were renamed.
    pub fn rename_columns(&mut self, mapping: &[(&str, &str)]) -> usize {
        let mut renamed = 0;
        for i in 0..self.columns.len() {
            let Some((_, to)) = mapping.iter().find(|(from, _)| *from == self.columns[i]) else {
                continue;
            };
            if self.has_column(to) {
                continue;
            }
            self.columns[i] = (*to).to_string();
            renamed += 1;
        }
        renamed
    }

    /// Pairs of `mapping` where both the source and the target name exist.
    pub fn rename_collisions<'a>(&self, mapping: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        mapping
            .iter()
            .filter(|(from, to)| self.has_column(from) && self.has_column(to))
            .copied()
            .collect()
    }

    /// Keep only the rows at `indices`, in that order.
    pub fn select_rows(self, indices: &[usize]) -> Self {
        let mut slots: Vec<Option<Vec<Value>>> = self.rows.into_iter().map(Some).collect();
        let rows = indices.iter().filter_map(|&i| slots.get_mut(i)?.take()).collect();
        Self {
            columns: self.columns,
            rows,
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawTable {
        let mut t = RawTable::new(vec!["id".into(), "userID".into(), "status".into()]);
        t.push_row(vec![Value::Integer(1), Value::Integer(7), "active".into()]);
        t.push_row(vec![Value::Integer(2), Value::Integer(8)]);
        t
    }

    #[test]
    fn short_rows_are_padded() {
        let t = sample();
        assert_eq!(t.get(1, "status"), Some(&Value::Null));
    }

    #[test]
    fn renaming_is_idempotent() {
        let mut t = sample();
        let mapping = [("userID", "applicant_id"), ("status", "application_status")];

        assert_eq!(t.rename_columns(&mapping), 2);
        let once = t.clone();
        assert_eq!(t.rename_columns(&mapping), 0);
        assert_eq!(t, once);
        assert!(t.has_column("applicant_id"));
        assert!(!t.has_column("userID"));
    }

    #[test]
    fn rename_never_duplicates_a_column() {
        let mut t = RawTable::new(vec!["status".into(), "application_status".into()]);
        let mapping = [("status", "application_status")];

        assert_eq!(t.rename_collisions(&mapping), vec![("status", "application_status")]);
        assert_eq!(t.rename_columns(&mapping), 0);
        assert_eq!(t.columns(), ["status", "application_status"]);
    }

    #[test]
    fn select_rows_reorders() {
        let t = sample().select_rows(&[1, 0]);
        assert_eq!(t.get(0, "id"), Some(&Value::Integer(2)));
        assert_eq!(t.get(1, "id"), Some(&Value::Integer(1)));
    }
}
