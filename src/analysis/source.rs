use crate::output::CompanyRecord;
use crate::AnalysisError;
use std::fmt;
use std::str::FromStr;

const FEATURE_PREFIX: &str = "feature:";

/// Which part of a company record an analysis reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Homepage,
    /// A feature page, by page id
    Feature(String),
    /// Homepage plus every feature page
    All,
    /// Several sources, concatenated in the given order
    Multiple(Vec<DataSource>),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Homepage => write!(f, "homepage"),
            Self::Feature(name) => write!(f, "{}{}", FEATURE_PREFIX, name),
            Self::All => write!(f, "all"),
            Self::Multiple(sources) => {
                let names: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", names.join(","))
            }
        }
    }
}

impl FromStr for DataSource {
    type Err = AnalysisError;

    /// Parses `homepage`, `all`, `feature:<name>` or a comma-separated list
    /// of those
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [] => Err(AnalysisError::UnknownSource(s.to_string())),
            [single] => parse_single(single),
            many => Ok(Self::Multiple(
                many.iter().map(|p| parse_single(p)).collect::<Result<_, _>>()?,
            )),
        }
    }
}

fn parse_single(s: &str) -> Result<DataSource, AnalysisError> {
    match s {
        "homepage" => Ok(DataSource::Homepage),
        "all" => Ok(DataSource::All),
        _ => match s.strip_prefix(FEATURE_PREFIX) {
            Some(name) if !name.is_empty() => Ok(DataSource::Feature(name.to_string())),
            _ => Err(AnalysisError::UnknownSource(s.to_string())),
        },
    }
}

/// Lists the sources a record can serve: `homepage` when a homepage was
/// scraped, then one `feature:<name>` per feature page
pub fn available_sources(record: &CompanyRecord) -> Vec<DataSource> {
    let mut sources = Vec::new();
    if record.homepage.is_some() {
        sources.push(DataSource::Homepage);
    }
    sources.extend(record.features.keys().cloned().map(DataSource::Feature));
    sources
}

/// Checks that every named source exists in `record`
///
/// `All` is always accepted.
pub fn validate_source(record: &CompanyRecord, source: &DataSource) -> Result<(), AnalysisError> {
    match source {
        DataSource::All => Ok(()),
        DataSource::Homepage if record.homepage.is_some() => Ok(()),
        DataSource::Feature(name) if record.features.contains_key(name) => Ok(()),
        DataSource::Multiple(sources) => sources.iter().try_for_each(|s| validate_source(record, s)),
        other => Err(AnalysisError::UnknownSource(other.to_string())),
    }
}

/// Assembles the text an analysis reads
///
/// A single homepage or feature source yields that page's content as is.
/// `All` labels each block:
///
/// ```text
/// HOMEPAGE CONTENT:
/// ...
///
/// FEATURE: sso
/// URL: https://acme.test/features/sso
/// CONTENT:
/// ...
/// ```
///
/// Pages with empty content are left out. Missing sources give an empty
/// string.
pub fn collect_content(record: &CompanyRecord, source: &DataSource) -> String {
    match source {
        DataSource::Homepage => record
            .homepage
            .as_ref()
            .map(|page| page.content.clone())
            .unwrap_or_default(),
        DataSource::Feature(name) => record
            .features
            .get(name)
            .map(|page| page.content.clone())
            .unwrap_or_default(),
        DataSource::All => {
            let mut blocks = Vec::new();
            if let Some(homepage) = record.homepage.as_ref().filter(|p| !p.content.is_empty()) {
                blocks.push(format!("HOMEPAGE CONTENT:\n{}\n", homepage.content));
            }
            for (name, page) in &record.features {
                if !page.content.is_empty() {
                    blocks.push(format!(
                        "FEATURE: {}\nURL: {}\nCONTENT:\n{}\n",
                        name, page.url, page.content
                    ));
                }
            }
            blocks.join("\n")
        }
        DataSource::Multiple(sources) => sources
            .iter()
            .map(|s| collect_content(record, s))
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PageRecord;
    use chrono::Utc;

    fn page(url: &str, content: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            scraped_at: Utc::now(),
            content: content.to_string(),
            raw_length: 0,
            clean_length: content.chars().count(),
        }
    }

    fn record() -> CompanyRecord {
        let mut record = CompanyRecord::new("Acme");
        record.set_homepage(page("https://acme.test/", "Welcome to Acme"));
        record.merge_features(vec![
            ("sso".to_string(), page("https://acme.test/features/sso", "Single sign-on")),
            ("empty".to_string(), page("https://acme.test/features/empty", "")),
        ]);
        record
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("homepage".parse::<DataSource>().unwrap(), DataSource::Homepage);
        assert_eq!("all".parse::<DataSource>().unwrap(), DataSource::All);
        assert_eq!(
            "feature:sso".parse::<DataSource>().unwrap(),
            DataSource::Feature("sso".to_string())
        );

        let multiple: DataSource = "homepage, feature:sso".parse().unwrap();
        assert_eq!(multiple.to_string(), "homepage,feature:sso");

        assert!("feature:".parse::<DataSource>().is_err());
        assert!("blog".parse::<DataSource>().is_err());
    }

    #[test]
    fn test_available_sources() {
        let sources = available_sources(&record());
        assert_eq!(
            sources,
            vec![
                DataSource::Homepage,
                DataSource::Feature("sso".to_string()),
                DataSource::Feature("empty".to_string()),
            ]
        );
        assert!(available_sources(&CompanyRecord::new("Empty")).is_empty());
    }

    #[test]
    fn test_validate_source() {
        let record = record();
        assert!(validate_source(&record, &DataSource::All).is_ok());
        assert!(validate_source(&record, &DataSource::Feature("sso".to_string())).is_ok());
        assert!(matches!(
            validate_source(&record, &DataSource::Feature("billing".to_string())),
            Err(AnalysisError::UnknownSource(_))
        ));
    }

    #[test]
    fn test_collect_all_labels_blocks() {
        let content = collect_content(&record(), &DataSource::All);
        assert_eq!(
            content,
            "HOMEPAGE CONTENT:\nWelcome to Acme\n\n\
             FEATURE: sso\nURL: https://acme.test/features/sso\nCONTENT:\nSingle sign-on\n"
        );
    }

    #[test]
    fn test_collect_single_sources() {
        let record = record();
        assert_eq!(collect_content(&record, &DataSource::Homepage), "Welcome to Acme");
        assert_eq!(
            collect_content(&record, &DataSource::Feature("sso".to_string())),
            "Single sign-on"
        );
        assert_eq!(collect_content(&record, &DataSource::Feature("empty".to_string())), "");
    }
}
