//! `dd/mm/yyyy` dates as used by the order endpoints.

use chrono::NaiveDate;

use crate::errors::AppError;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::field(field, "Invalid date format. Please use 'dd/mm/yyyy'."))
}
