use crate::errors::AppError;
use crate::models::Expense;
use crate::stats::parse_date;
use chrono::NaiveDate;

pub const CSV_HEADER: &str = "Date,Title,Amount,Category,Payment Mode";

/// Renders expenses as CSV with a trailing total row. Fields are written
/// verbatim, so a comma inside a title shifts that row's columns.
pub fn expenses_csv(expenses: &[Expense]) -> Result<String, AppError> {
    if expenses.is_empty() {
        return Err(AppError::bad_request("No expenses to export"));
    }

    let mut lines = Vec::with_capacity(expenses.len() + 2);
    lines.push(CSV_HEADER.to_string());
    for expense in expenses {
        let date = parse_date(&expense.date)
            .map(display_date)
            .unwrap_or_else(|| "Invalid Date".to_string());
        lines.push(format!(
            "{date},{},{},{},{}",
            expense.title, expense.amount, expense.category, expense.payment_mode
        ));
    }

    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();
    lines.push(format!(",Total,{total},,"));
    Ok(lines.join("\n"))
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("expenses_{}.csv", today.format("%-m-%-d-%Y"))
}

fn display_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}
