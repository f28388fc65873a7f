use crate::table::Table;
use crate::table::TableError;
use std::collections::HashSet;

impl Table {
    /// Keeps exactly the chosen columns, in the chosen order.
    ///
    /// # Errors
    /// Fails without touching the table if a name is unknown or appears twice.
    pub fn select_columns<S: AsRef<str>>(&mut self, chosen: &[S]) -> Result<(), TableError> {
        let mut seen = HashSet::<&str>::new();
        let indexes = chosen
            .iter()
            .map(|name| {
                let name = name.as_ref();
                if !seen.insert(name) {
                    return Err(TableError::DuplicateColumn(name.to_owned()));
                }
                self.column_index(name)
                    .ok_or_else(|| TableError::UnknownColumn(name.to_owned()))
            })
            .collect::<Result<Vec<usize>, TableError>>()?;

        self.columns = indexes.iter().map(|index| self.columns[*index].clone()).collect();
        for row in self.rows.iter_mut() {
            let mut cells: Vec<_> = row.drain(..).map(Some).collect();
            *row = indexes
                .iter()
                .map(|index| cells[*index].take().unwrap_or_default())
                .collect();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::spreadsheet::cell::CellValue;
    use crate::table::tests::text_table;
    use crate::table::TableError;

    #[test]
    fn select_all_columns_is_identity() {
        let mut table = text_table(&["k", "v", "w"], &[&["a", "1", "x"], &["b", "", "y"]]);
        let before = table.clone();
        let names: Vec<String> = table.column_names().into_iter().map(String::from).collect();
        table.select_columns(&names).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn select_reorders_columns() {
        let mut table = text_table(&["k", "v", "w"], &[&["a", "1", "x"]]);
        table.select_columns(&["w", "k"]).unwrap();

        assert_eq!(table.column_names(), vec!["w", "k"]);
        assert_eq!(
            table.rows()[0],
            vec![CellValue::Text("x".to_owned()), CellValue::Text("a".to_owned())]
        );
    }

    #[test]
    fn select_rejects_unknown_column() {
        let mut table = text_table(&["k"], &[&["a"]]);
        let before = table.clone();
        let result = table.select_columns(&["k", "missing"]);

        assert!(matches!(result, Err(TableError::UnknownColumn(name)) if name == "missing"));
        assert_eq!(table, before);
    }

    #[test]
    fn select_rejects_repeated_column() {
        let mut table = text_table(&["k", "v"], &[&["a", "1"]]);
        assert!(matches!(table.select_columns(&["k", "k"]), Err(TableError::DuplicateColumn(_))));
    }
}
