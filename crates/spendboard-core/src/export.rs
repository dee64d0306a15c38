//! CSV export of the filtered expense list

use std::io::Write;

use crate::error::CoreResult;
use crate::models::Expense;

const HEADER: [&str; 4] = ["Date", "Description", "Category", "Amount"];

/// Write expenses as CSV, in the order given
pub fn write_csv<W: Write>(expenses: &[Expense], writer: W, delimiter: u8) -> CoreResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for expense in expenses {
        csv_writer.write_record([
            expense.date_key(),
            expense.description.clone(),
            expense.category_label().to_string(),
            expense.amount.to_string(),
        ])?;
    }
    csv_writer.flush()?;

    log::info!("exported {} expenses", expenses.len());
    Ok(())
}

/// Render expenses as a CSV string
pub fn to_csv_string(expenses: &[Expense], delimiter: u8) -> CoreResult<String> {
    let mut buffer = Vec::new();
    write_csv(expenses, &mut buffer, delimiter)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn expenses() -> Vec<Expense> {
        vec![
            Expense {
                id: 1,
                description: "Dinner, with friends".to_string(),
                amount: Decimal::from_str("42.50").unwrap(),
                expense_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                category_id: Some(1),
                category_name: Some("Food".to_string()),
                recurring: None,
            },
            Expense {
                id: 2,
                description: "Stamps".to_string(),
                amount: Decimal::from(3),
                expense_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                category_id: None,
                category_name: None,
                recurring: None,
            },
        ]
    }

    #[test]
    fn test_csv_rows_and_quoting() {
        let csv = to_csv_string(&expenses(), b',').unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Description,Category,Amount");
        assert_eq!(lines[1], "2024-03-02,\"Dinner, with friends\",Food,42.50");
        assert_eq!(lines[2], "2024-03-05,Stamps,Uncategorized,3");
    }

    #[test]
    fn test_csv_custom_delimiter() {
        let csv = to_csv_string(&expenses(), b';').unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("2024-03-02;Dinner, with friends;Food"));
    }

    #[test]
    fn test_csv_empty_has_header_only() {
        let csv = to_csv_string(&[], b',').unwrap();
        assert_eq!(csv, "Date,Description,Category,Amount\n");
    }
}
