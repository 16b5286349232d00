use lambda_http::Error;

pub(crate) const TABLE_ENV: &str = "USERS_TABLE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub table_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let table_name = lookup(TABLE_ENV)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::from(format!("{TABLE_ENV} not set")))?;

        Ok(Self { table_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn reads_table_name() {
        let config = Config::from_lookup(|key| {
            assert_eq!(key, TABLE_ENV);
            Some("users-dev".to_string())
        })
        .unwrap();

        assert_eq!(config.table_name, "users-dev");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn missing_table_name_is_an_error(#[case] value: Option<&str>) {
        let err = Config::from_lookup(|_| value.map(str::to_string)).unwrap_err();

        assert_eq!(err.to_string(), "USERS_TABLE not set");
    }
}
