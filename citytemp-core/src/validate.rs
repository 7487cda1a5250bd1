use crate::{error::TemperatureError, model::Query};

pub const MIN_CITY_LEN: usize = 3;

/// Accented letters accepted in city names on top of ASCII letters.
const ACCENTED: &[char] = &['à', 'è', 'é', 'ì', 'ò', 'ù', 'À', 'È', 'É', 'Ì', 'Ò', 'Ù'];

fn is_city_char(c: char) -> bool {
    c.is_ascii_alphabetic() || ACCENTED.contains(&c) || c.is_whitespace() || c == '\''
}

/// Check the raw tool arguments and turn them into a [`Query`].
///
/// Constraints are checked in order (city length, city characters, past days)
/// and only the first violation is reported.
pub fn validate(city: &str, past_days: i64) -> Result<Query, TemperatureError> {
    if city.chars().count() < MIN_CITY_LEN {
        return Err(TemperatureError::Validation(format!(
            "city must have at least {MIN_CITY_LEN} characters"
        )));
    }

    if let Some(bad) = city.chars().find(|c| !is_city_char(*c)) {
        return Err(TemperatureError::Validation(format!(
            "city may only contain letters, spaces and apostrophes (found {bad:?})"
        )));
    }

    if past_days < 0 {
        return Err(TemperatureError::Validation(
            "past days must be greater than or equal to 0".to_string(),
        ));
    }

    let past_days = u32::try_from(past_days)
        .map_err(|_| TemperatureError::Validation(format!("past days out of range: {past_days}")))?;

    Ok(Query::new(city.to_string(), past_days))
}
