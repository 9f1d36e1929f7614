//! CSV report rendering.
//!
//! Reproduces the legacy spreadsheet layout: `PRODUCT NAME`, `CAS NUMBER`,
//! then one column per category in declared order, with membership marked
//! `X` and absence left empty.

use std::io::Write;
use std::path::Path;

use chemextract_models::{CategoryCatalog, ClassificationRow};
use chemextract_utils::{ChemExtractError, ChemExtractResult};

pub const PRODUCT_NAME_HEADER: &str = "PRODUCT NAME";
pub const CAS_NUMBER_HEADER: &str = "CAS NUMBER";

const MEMBER_MARK: &str = "X";

/// Column headers in output order.
pub fn report_headers(catalog: &CategoryCatalog) -> Vec<String> {
    let mut headers = vec![
        PRODUCT_NAME_HEADER.to_string(),
        CAS_NUMBER_HEADER.to_string(),
    ];
    headers.extend(catalog.names().map(|name| name.to_uppercase()));
    headers
}

/// Render rows into any writer. Rows arrive already in presentation form;
/// this step only serializes.
pub fn render_report<W: Write>(
    rows: &[ClassificationRow],
    catalog: &CategoryCatalog,
    writer: W,
) -> ChemExtractResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(report_headers(catalog))
        .map_err(csv_error)?;

    for row in rows {
        let mut record = vec![row.product_name.clone(), row.cas_number.clone()];
        for category in catalog.names() {
            record.push(if row.flag(category) {
                MEMBER_MARK.to_string()
            } else {
                String::new()
            });
        }
        csv_writer.write_record(&record).map_err(csv_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write a timestamped report file into the results directory and return
/// its filename.
pub fn write_report(
    rows: &[ClassificationRow],
    catalog: &CategoryCatalog,
    results_dir: &Path,
    timestamp: &str,
) -> ChemExtractResult<String> {
    std::fs::create_dir_all(results_dir)?;

    let filename = format!("CAS_Extract_{timestamp}.csv");
    let file = std::fs::File::create(results_dir.join(&filename))?;
    render_report(rows, catalog, file)?;

    Ok(filename)
}

fn csv_error(error: csv::Error) -> ChemExtractError {
    ChemExtractError::internal(format!("report rendering failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemextract_models::{CategoryMembership, CategoryTable};

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(vec![
            CategoryTable::new("banned", ["50-00-0".to_string()].into_iter().collect()),
            CategoryTable::empty("schedule-1"),
        ])
    }

    fn row(product: &str, cas: &str, banned: bool) -> ClassificationRow {
        ClassificationRow {
            product_name: product.to_string(),
            cas_number: cas.to_string(),
            memberships: vec![
                CategoryMembership {
                    category: "banned".to_string(),
                    member: banned,
                },
                CategoryMembership {
                    category: "schedule-1".to_string(),
                    member: false,
                },
            ],
        }
    }

    #[test]
    fn test_headers_follow_declared_order() {
        let headers = report_headers(&catalog());
        assert_eq!(
            headers,
            vec!["PRODUCT NAME", "CAS NUMBER", "BANNED", "SCHEDULE-1"]
        );
    }

    #[test]
    fn test_membership_marks() {
        let rows = vec![
            row("formalin", "50-00-0", true),
            row("", "7732-18-5", false),
        ];

        let mut rendered = Vec::new();
        render_report(&rows, &catalog(), &mut rendered).expect("render");
        let text = String::from_utf8(rendered).expect("utf8 csv");

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "PRODUCT NAME,CAS NUMBER,BANNED,SCHEDULE-1");
        assert_eq!(lines[1], "formalin,50-00-0,X,");
        assert_eq!(lines[2], ",7732-18-5,,");
    }

    #[test]
    fn test_write_report_names_file_with_timestamp() {
        let dir = std::env::temp_dir().join(format!("chemextract-report-{}", std::process::id()));
        let filename = write_report(
            &[row("formalin", "50-00-0", true)],
            &catalog(),
            &dir,
            "20260101_000000",
        )
        .expect("write report");

        assert_eq!(filename, "CAS_Extract_20260101_000000.csv");
        assert!(dir.join(&filename).exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
