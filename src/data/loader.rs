use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Result};

use super::error::LoadError;
use super::model::{CellValue, Descriptive, Exif, Focus, LensCatalog, LensRecord};
use super::sheet::{read_csv_sheet, read_workbook, RawSheet};
use crate::config::{SHEET_EXIF, SHEET_NO_EXIF};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the lens catalog from disk. Dispatch by extension.
///
/// Supported inputs:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – workbook with sheets
///   `All` (lenses with EXIF data) and `no exif`
/// * a directory – one CSV export per sheet: `All.csv`, `no exif.csv`
pub fn load_file(path: &Path) -> Result<LensCatalog> {
    let sheets = if path.is_dir() {
        vec![
            read_csv_sheet(&path.join(format!("{SHEET_EXIF}.csv")), SHEET_EXIF)?,
            read_csv_sheet(&path.join(format!("{SHEET_NO_EXIF}.csv")), SHEET_NO_EXIF)?,
        ]
    } else {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
                read_workbook(path, &[SHEET_EXIF, SHEET_NO_EXIF])?
            }
            other => bail!("Unsupported file extension: .{other}"),
        }
    };

    let mut sheets = sheets.into_iter();
    let (Some(with_exif), Some(without_exif)) = (sheets.next(), sheets.next()) else {
        bail!("expected sheets '{SHEET_EXIF}' and '{SHEET_NO_EXIF}'");
    };

    let catalog = normalize(&[(with_exif, Exif::Yes), (without_exif, Exif::No)])?;
    log::info!(
        "Loaded {} lenses from {} manufacturers ({})",
        catalog.len(),
        catalog.manufacturers().len(),
        path.display()
    );
    Ok(catalog)
}

/// Turn raw sheets into the catalog: rename columns, tag each sheet's rows
/// with its `Exif` value, concatenate, parse every cell and sort by weight.
pub fn normalize(sources: &[(RawSheet, Exif)]) -> Result<LensCatalog, LoadError> {
    let mut records = Vec::new();

    for (sheet, exif) in sources {
        let columns = map_columns(sheet)?;
        let before = records.len();

        for (i, cells) in sheet.rows.iter().enumerate() {
            if cells.iter().all(CellValue::is_blank) {
                log::debug!("sheet '{}': skipping blank row {}", sheet.name, i + 2);
                continue;
            }
            let row = RowReader {
                sheet: &sheet.name,
                row: i + 2,
                cells,
                columns: &columns,
            };
            records.push(row.record(*exif)?);
        }

        log::debug!(
            "sheet '{}': {} lenses (Exif = {exif})",
            sheet.name,
            records.len() - before
        );
    }

    Ok(LensCatalog::from_records(records))
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Lens,
    Manufacturer,
    FocalLength,
    Aperture,
    Weight,
    Price,
    Magnification,
    FilterDiameter,
    CloseFocusingDistance,
    Diameter,
    Length,
    Focus,
    ApertureBlades,
    ElementsGroups,
    OpticalStabilizer,
    UsedPrice,
    Comments,
}

impl Column {
    const REQUIRED: [Column; 12] = [
        Column::Lens,
        Column::Manufacturer,
        Column::FocalLength,
        Column::Aperture,
        Column::Weight,
        Column::Price,
        Column::Magnification,
        Column::FilterDiameter,
        Column::CloseFocusingDistance,
        Column::Diameter,
        Column::Length,
        Column::Focus,
    ];

    fn name(self) -> &'static str {
        match self {
            Column::Lens => "Lens",
            Column::Manufacturer => "Manufacturer",
            Column::FocalLength => "Focal Length",
            Column::Aperture => "Aperture",
            Column::Weight => "Weight",
            Column::Price => "Price",
            Column::Magnification => "Magnification",
            Column::FilterDiameter => "Filter Diameter",
            Column::CloseFocusingDistance => "Close Focusing Distance",
            Column::Diameter => "Diameter",
            Column::Length => "Length",
            Column::Focus => "Focus",
            Column::ApertureBlades => "Aperture Blades",
            Column::ElementsGroups => "Elements & Groups",
            Column::OpticalStabilizer => "Optical Stabilizer",
            Column::UsedPrice => "Used price",
            Column::Comments => "Comments",
        }
    }
}

/// Collapse newlines and runs of spaces: `"Close\nFocusing\nDistance "`
/// becomes `"Close Focusing Distance"`.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn canonical_column(raw: &str) -> Option<Column> {
    let header = normalize_header(raw).to_lowercase();
    let column = match header.as_str() {
        "lens" => Column::Lens,
        "manufacturer" => Column::Manufacturer,
        "focal length" => Column::FocalLength,
        "speed" | "aperture" => Column::Aperture,
        "weight" => Column::Weight,
        "magnification" => Column::Magnification,
        "front filter diameter" | "filter diameter" => Column::FilterDiameter,
        "close focusing distance" => Column::CloseFocusingDistance,
        "diameter" => Column::Diameter,
        "length" => Column::Length,
        "focus" => Column::Focus,
        "aperture blades" => Column::ApertureBlades,
        "elements/ groups" | "elements/groups" | "elements & groups" => Column::ElementsGroups,
        "optical stabilizer" => Column::OpticalStabilizer,
        "comment, resources" | "comments" => Column::Comments,
        h if h.starts_with("price") => Column::Price,
        h if h.starts_with("used price") => Column::UsedPrice,
        _ => return None,
    };
    Some(column)
}

fn map_columns(sheet: &RawSheet) -> Result<HashMap<Column, usize>, LoadError> {
    let mut columns = HashMap::new();
    for (idx, header) in sheet.headers.iter().enumerate() {
        match canonical_column(header) {
            Some(col) => {
                if columns.contains_key(&col) {
                    log::debug!("sheet '{}': duplicate column {header:?} ignored", sheet.name);
                } else {
                    columns.insert(col, idx);
                }
            }
            None => log::debug!("sheet '{}': ignoring column {header:?}", sheet.name),
        }
    }

    if let Some(missing) = Column::REQUIRED.iter().find(|c| !columns.contains_key(*c)) {
        return Err(LoadError::Schema {
            sheet: sheet.name.clone(),
            column: missing.name().to_string(),
        });
    }
    Ok(columns)
}

// ---------------------------------------------------------------------------
// Multi-value cells
// ---------------------------------------------------------------------------

/// Separator between zoom-range breakpoints, e.g. `"24-70"` or `"3.5-5.6"`.
pub const RANGE_DELIMITER: char = '-';

/// A focal-length or aperture cell: one number, or the breakpoints of a zoom.
#[derive(Debug, Clone, PartialEq)]
pub enum MultiValue {
    Scalar(f64),
    Range(Vec<f64>),
}

impl MultiValue {
    /// Numbers are scalars; text is split on [`RANGE_DELIMITER`].
    pub fn parse(cell: &CellValue) -> Result<Self, String> {
        match cell {
            CellValue::Float(_) | CellValue::Integer(_) => {
                let v = cell.as_f64().unwrap_or(f64::NAN);
                finite(v).map(MultiValue::Scalar)
            }
            CellValue::String(s) => {
                let mut values = s
                    .split(RANGE_DELIMITER)
                    .map(parse_number)
                    .collect::<Result<Vec<f64>, String>>()?;
                if values.len() == 1 {
                    Ok(MultiValue::Scalar(values.remove(0)))
                } else {
                    Ok(MultiValue::Range(values))
                }
            }
            CellValue::Null => Err("value is missing".to_string()),
            CellValue::Bool(_) => Err("expected a number or a range".to_string()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MultiValue::Scalar(_) => 1,
            MultiValue::Range(values) => values.len(),
        }
    }

    pub fn into_values(self) -> Vec<f64> {
        match self {
            MultiValue::Scalar(v) => vec![v],
            MultiValue::Range(values) => values,
        }
    }
}

/// Pair focal lengths with apertures. A scalar aperture is repeated for
/// every focal-length breakpoint; otherwise both must have equal length.
pub fn pair_focal_aperture(
    focal: MultiValue,
    aperture: MultiValue,
) -> Result<(Vec<f64>, Vec<f64>), String> {
    let n = focal.len();
    let aperture = match aperture {
        MultiValue::Scalar(a) => vec![a; n],
        MultiValue::Range(values) if values.len() == n => values,
        MultiValue::Range(values) => {
            return Err(format!(
                "{} aperture values for {n} focal lengths",
                values.len()
            ))
        }
    };
    Ok((focal.into_values(), aperture))
}

fn parse_number(token: &str) -> Result<f64, String> {
    let token = token.trim();
    if token.is_empty() {
        return Err("empty number".to_string());
    }
    token
        .parse::<f64>()
        .map_err(|_| format!("'{token}' is not a number"))
        .and_then(finite)
}

fn finite(v: f64) -> Result<f64, String> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err("number is not finite".to_string())
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

struct RowReader<'a> {
    sheet: &'a str,
    row: usize,
    cells: &'a [CellValue],
    columns: &'a HashMap<Column, usize>,
}

static NULL: CellValue = CellValue::Null;

impl RowReader<'_> {
    fn record(&self, exif: Exif) -> Result<LensRecord, LoadError> {
        let focal = self.multi(Column::FocalLength)?;
        let aperture = self.multi(Column::Aperture)?;
        let (focal_length, aperture) =
            pair_focal_aperture(focal, aperture).map_err(|e| self.error(Column::Aperture, e))?;

        Ok(LensRecord {
            lens: self.text(Column::Lens)?,
            manufacturer: self.text(Column::Manufacturer)?,
            focal_length,
            aperture,
            weight: self.number(Column::Weight)?,
            price: self.number(Column::Price)?,
            magnification: self.number(Column::Magnification)?,
            filter_diameter: self.optional_number(Column::FilterDiameter)?,
            close_focusing_distance: self.number(Column::CloseFocusingDistance)?,
            diameter: self.number(Column::Diameter)?,
            length: self.number(Column::Length)?,
            focus: self.focus()?,
            exif,
            descriptive: Descriptive {
                aperture_blades: self.passthrough(Column::ApertureBlades),
                elements_groups: self.passthrough(Column::ElementsGroups),
                optical_stabilizer: self.passthrough(Column::OpticalStabilizer),
                used_price: self.passthrough(Column::UsedPrice),
                comments: self.passthrough(Column::Comments),
            },
        })
    }

    fn cell(&self, col: Column) -> &CellValue {
        self.columns
            .get(&col)
            .and_then(|&idx| self.cells.get(idx))
            .unwrap_or(&NULL)
    }

    fn error(&self, col: Column, reason: impl Into<String>) -> LoadError {
        LoadError::DataFormat {
            sheet: self.sheet.to_string(),
            row: self.row,
            column: col.name().to_string(),
            value: self.cell(col).to_string(),
            reason: reason.into(),
        }
    }

    fn text(&self, col: Column) -> Result<String, LoadError> {
        let cell = self.cell(col);
        if cell.is_blank() {
            return Err(self.error(col, "value is missing"));
        }
        Ok(cell.to_string().trim().to_string())
    }

    fn number(&self, col: Column) -> Result<f64, LoadError> {
        let parsed = match self.cell(col) {
            CellValue::String(s) => parse_number(s),
            CellValue::Null => Err("value is missing".to_string()),
            CellValue::Bool(_) => Err("expected a number".to_string()),
            cell => finite(cell.as_f64().unwrap_or(f64::NAN)),
        };
        parsed.map_err(|e| self.error(col, e))
    }

    /// Empty cells and the literal `na` are missing values, never zero.
    fn optional_number(&self, col: Column) -> Result<Option<f64>, LoadError> {
        match self.cell(col) {
            cell if cell.is_blank() => Ok(None),
            CellValue::String(s) if s.trim().eq_ignore_ascii_case("na") => Ok(None),
            _ => self.number(col).map(Some),
        }
    }

    fn multi(&self, col: Column) -> Result<MultiValue, LoadError> {
        MultiValue::parse(self.cell(col)).map_err(|e| self.error(col, e))
    }

    fn focus(&self) -> Result<Focus, LoadError> {
        match self.text(Column::Focus)?.to_ascii_uppercase().as_str() {
            "AF" => Ok(Focus::AF),
            "MF" => Ok(Focus::MF),
            _ => Err(self.error(Column::Focus, "expected AF or MF")),
        }
    }

    fn passthrough(&self, col: Column) -> Option<CellValue> {
        match self.cell(col) {
            cell if cell.is_blank() => None,
            cell => Some(cell.clone()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::model::LensKind;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn f(v: f64) -> CellValue {
        CellValue::Float(v)
    }

    pub(crate) fn exif_headers() -> Vec<String> {
        [
            "Lens",
            "Manufacturer",
            "Focal\nLength",
            "Speed",
            "Weight",
            "Price \n(please check \nfor actual)",
            "Magnification",
            "Front Filter \nDiameter",
            "Close\nFocusing\nDistance ",
            "Diameter",
            "Length",
            "Focus",
            "Aperture\nBlades",
            "Comment, \nResources",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect()
    }

    pub(crate) fn exif_sheet() -> RawSheet {
        RawSheet::new(
            "All",
            exif_headers(),
            vec![
                vec![
                    s("FE 50mm F1.8"),
                    s("Sony"),
                    f(50.0),
                    f(1.8),
                    f(186.0),
                    f(248.0),
                    f(0.14),
                    f(49.0),
                    f(45.0),
                    f(68.6),
                    f(59.5),
                    s("AF"),
                    f(7.0),
                    CellValue::Null,
                ],
                vec![
                    s("FE 24-70mm F2.8 GM"),
                    s("Sony"),
                    s("24-70"),
                    f(2.8),
                    f(886.0),
                    f(2198.0),
                    f(0.24),
                    f(82.0),
                    f(38.0),
                    f(87.6),
                    f(136.0),
                    s("AF"),
                    f(9.0),
                    s("great"),
                ],
            ],
        )
    }

    pub(crate) fn no_exif_sheet() -> RawSheet {
        let mut headers = exif_headers();
        headers[5] = "Price \n(please check \nfor current)".to_string();
        RawSheet::new(
            "no exif",
            headers,
            vec![
                vec![
                    s("Fisheye 8mm"),
                    s("Meike"),
                    f(8.0),
                    s("3.5"),
                    f(350.0),
                    s("199"),
                    f(0.1),
                    s("na"),
                    f(20.0),
                    f(70.0),
                    f(60.0),
                    s("MF"),
                    CellValue::Null,
                    CellValue::Null,
                ],
                vec![CellValue::Null; 14],
            ],
        )
    }

    #[test]
    fn headers_collapse_whitespace() {
        assert_eq!(normalize_header("Close\nFocusing\nDistance "), "Close Focusing Distance");
        assert_eq!(canonical_column("Front Filter \nDiameter"), Some(Column::FilterDiameter));
        assert_eq!(canonical_column("Price \n(please check \nfor current)"), Some(Column::Price));
        assert_eq!(
            canonical_column("Used price\n (average \nauction 7/20)"),
            Some(Column::UsedPrice)
        );
        assert_eq!(canonical_column("Elements/\nGroups"), Some(Column::ElementsGroups));
        assert_eq!(canonical_column("Mount"), None);
    }

    #[test]
    fn multi_value_cells() {
        assert_eq!(MultiValue::parse(&f(50.0)), Ok(MultiValue::Scalar(50.0)));
        assert_eq!(MultiValue::parse(&s("35")), Ok(MultiValue::Scalar(35.0)));
        assert_eq!(
            MultiValue::parse(&s("3.5 - 5.6")),
            Ok(MultiValue::Range(vec![3.5, 5.6]))
        );
        assert!(MultiValue::parse(&s("24,70")).is_err());
        assert!(MultiValue::parse(&s("24-")).is_err());
        assert!(MultiValue::parse(&CellValue::Null).is_err());
    }

    #[test]
    fn scalar_aperture_is_broadcast() {
        let (fl, ap) =
            pair_focal_aperture(MultiValue::Range(vec![24.0, 105.0]), MultiValue::Scalar(4.0))
                .unwrap();
        assert_eq!(fl, vec![24.0, 105.0]);
        assert_eq!(ap, vec![4.0, 4.0]);

        let (fl, ap) = pair_focal_aperture(
            MultiValue::Range(vec![28.0, 200.0]),
            MultiValue::Range(vec![2.8, 5.6]),
        )
        .unwrap();
        assert_eq!(fl.len(), ap.len());

        assert!(pair_focal_aperture(
            MultiValue::Scalar(50.0),
            MultiValue::Range(vec![1.4, 2.0])
        )
        .is_err());
    }

    #[test]
    fn normalize_merges_tags_and_sorts() {
        let catalog = normalize(&[(exif_sheet(), Exif::Yes), (no_exif_sheet(), Exif::No)]).unwrap();
        assert_eq!(catalog.len(), 3);

        let names: Vec<&str> = catalog.lenses().iter().map(|l| l.lens.as_str()).collect();
        assert_eq!(names, ["FE 24-70mm F2.8 GM", "Fisheye 8mm", "FE 50mm F1.8"]);

        for lens in catalog.lenses() {
            assert_eq!(lens.focal_length.len(), lens.aperture.len());
        }

        let zoom = &catalog.lenses()[0];
        assert_eq!(zoom.kind(), LensKind::Zoom);
        assert_eq!(zoom.aperture, vec![2.8, 2.8]);
        assert_eq!(zoom.exif, Exif::Yes);
        assert_eq!(zoom.descriptive.comments, Some(s("great")));

        let fisheye = &catalog.lenses()[1];
        assert_eq!(fisheye.exif, Exif::No);
        assert_eq!(fisheye.focus, Focus::MF);
        assert_eq!(fisheye.price, 199.0);
        assert_eq!(fisheye.filter_diameter, None);
        assert_eq!(fisheye.descriptive.aperture_blades, None);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let mut sheet = exif_sheet();
        sheet.headers[4] = "Mass".to_string();
        let err = normalize(&[(sheet, Exif::Yes)]).unwrap_err();
        assert_eq!(
            err,
            LoadError::Schema {
                sheet: "All".to_string(),
                column: "Weight".to_string()
            }
        );
    }

    #[test]
    fn bad_cell_is_a_data_format_error() {
        let mut sheet = exif_sheet();
        sheet.rows[1][2] = s("24-seventy");
        match normalize(&[(sheet, Exif::Yes)]).unwrap_err() {
            LoadError::DataFormat { sheet, row, column, value, .. } => {
                assert_eq!(sheet, "All");
                assert_eq!(row, 3);
                assert_eq!(column, "Focal Length");
                assert_eq!(value, "24-seventy");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn blank_required_number_is_a_data_format_error() {
        let mut sheet = no_exif_sheet();
        sheet.rows[0][5] = CellValue::Null;
        match normalize(&[(sheet, Exif::No)]).unwrap_err() {
            LoadError::DataFormat { sheet, row, column, value, reason } => {
                assert_eq!(sheet, "no exif");
                assert_eq!(row, 2);
                assert_eq!(column, "Price");
                assert_eq!(value, "");
                assert_eq!(reason, "value is missing");
            }
            other => panic!("unexpected error {other:?}"),
        }

        let mut sheet = exif_sheet();
        sheet.rows[1][10] = s("  ");
        assert!(matches!(
            normalize(&[(sheet, Exif::Yes)]),
            Err(LoadError::DataFormat { row: 3, column, .. }) if column == "Length"
        ));
    }

    #[test]
    fn unknown_focus_is_rejected() {
        let mut sheet = exif_sheet();
        sheet.rows[0][11] = s("Auto");
        assert!(matches!(
            normalize(&[(sheet, Exif::Yes)]),
            Err(LoadError::DataFormat { column, .. }) if column == "Focus"
        ));
    }

    #[test]
    fn load_file_reads_csv_exports() {
        let dir = tempfile::tempdir().unwrap();
        let header = "Lens,Manufacturer,\"Focal\nLength\",Speed,Weight,Price,Magnification,\
                      Front Filter Diameter,Close Focusing Distance,Diameter,Length,Focus\n";
        std::fs::write(
            dir.path().join("All.csv"),
            format!("{header}FE 24-70mm F2.8 GM,Sony,24-70,2.8,886,2198,0.24,82,38,87.6,136,AF\n"),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("no exif.csv"),
            format!("{header}Fisheye 8mm,Meike,8,3.5,350,199,0.1,na,20,70,60,MF\n"),
        )
        .unwrap();

        let catalog = load_file(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lenses()[0].focal_length, vec![24.0, 70.0]);
        assert_eq!(catalog.lenses()[1].exif, Exif::No);
    }

    #[test]
    fn unsupported_extension_fails() {
        assert!(load_file(Path::new("lenses.parquet")).is_err());
    }
}
