use std::fs;
use std::io::Write;
use std::path::Path;

use introcar_data::{ChassisJob, DataError};
use tempfile::TempDir;

#[test]
fn builds_nested_year_table() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("chassis.csv");
    fs::write(
        &input,
        "\
Make,Model,Year start,Chassis
Bentley,T2,1978,SBH35000
Bentley,T2,1977,SBH30001
Bentley,T2,1977,SBH30050
Rolls-Royce,Corniche,1971,CRX10001
Rolls-Royce,Corniche,1971,DRX-A
",
    )
    .unwrap();
    let output = tmp.path().join("chassis-years.json");

    let (rows, table) = ChassisJob::new(&input, &output).run().unwrap();
    assert_eq!(rows, 5);
    assert_eq!(table.make_count(), 2);
    assert_eq!(table.model_count(), 2);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();

    let t2 = &json["Bentley"]["T2"];
    assert_eq!(t2["yearStart"], 1977);
    assert_eq!(t2["yearEnd"], 1978);
    let years: Vec<_> = t2["years"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(years, vec!["1977", "1978"]);
    assert_eq!(t2["years"]["1977"]["chassisFirst"], "SBH30001");
    assert_eq!(t2["years"]["1977"]["chassisLast"], "SBH30050");
    assert_eq!(t2["years"]["1977"]["chassisNumericStart"], 30001);
    assert_eq!(t2["years"]["1977"]["chassisNumericEnd"], 30050);
    assert_eq!(t2["years"]["1977"]["count"], 2);

    let corniche = &json["Rolls-Royce"]["Corniche"]["years"]["1971"];
    assert_eq!(corniche["chassisLast"], "DRX-A");
    assert!(corniche["chassisNumericStart"].is_null());
    assert!(corniche["chassisNumericEnd"].is_null());
}

#[test]
fn missing_input_is_fatal_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("chassis-years.json");
    let err = ChassisJob::new(tmp.path().join("nope.csv"), &output)
        .run()
        .unwrap_err();
    assert!(matches!(err, DataError::Io { .. }));
    assert!(!output.exists());
}

/// Write a single-sheet workbook with inline-string and numeric cells.
fn write_xlsx(path: &Path, rows: &[&[Cell]]) {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", (b'A' + c as u8) as char, r + 1);
            match cell {
                Cell::Text(t) => sheet.push_str(&format!(
                    r#"<c r="{cell_ref}" t="inlineStr"><is><t>{t}</t></is></c>"#
                )),
                Cell::Num(n) => sheet.push_str(&format!(r#"<c r="{cell_ref}"><v>{n}</v></c>"#)),
            }
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="T2 Chassis Master" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
        ),
        ("xl/worksheets/sheet1.xml", sheet),
    ];

    let mut zip = zip::ZipWriter::new(fs::File::create(path).unwrap());
    for (name, body) in parts {
        zip.start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

enum Cell {
    Text(&'static str),
    Num(f64),
}

#[test]
fn reads_xlsx_chassis_master() {
    use Cell::{Num, Text};

    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("Master Data - T2 Chassis Master.xlsx");
    write_xlsx(
        &input,
        &[
            &[Text("Make"), Text("Model"), Text("Year start"), Text("Chassis")],
            &[Text("Bentley"), Text("T2"), Num(1977.0), Num(30001.0)],
            &[Text("Bentley"), Text("T2"), Num(1977.0), Text("SBH30050")],
            &[Text("Bentley"), Text("T2"), Num(1979.0), Text("SBH-A")],
        ],
    );
    let output = tmp.path().join("chassis-years.json");

    let (rows, table) = ChassisJob::new(&input, &output).run().unwrap();
    assert_eq!(rows, 3);
    assert_eq!(table.model_count(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let t2 = &json["Bentley"]["T2"];
    assert_eq!(t2["yearStart"], 1977);
    assert_eq!(t2["yearEnd"], 1979);
    assert_eq!(t2["years"]["1977"]["chassisFirst"], "30001");
    assert_eq!(t2["years"]["1977"]["chassisLast"], "SBH30050");
    assert_eq!(t2["years"]["1977"]["chassisNumericStart"], 30001);
    assert_eq!(t2["years"]["1977"]["count"], 2);
    assert!(t2["years"]["1979"]["chassisNumericStart"].is_null());
}

#[test]
fn xlsx_without_required_column_is_fatal() {
    use Cell::Text;

    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("chassis.xlsx");
    write_xlsx(&input, &[&[Text("Make"), Text("Model"), Text("Chassis")]]);
    let output = tmp.path().join("chassis-years.json");

    let err = ChassisJob::new(&input, &output).run().unwrap_err();
    assert!(matches!(err, DataError::MissingColumn { .. }));
    assert!(!output.exists());
}

#[test]
fn unreadable_workbook_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("chassis.xlsx");
    fs::write(&input, "Make,Model,Year start,Chassis\n").unwrap();

    let err = ChassisJob::new(&input, tmp.path().join("out.json"))
        .run()
        .unwrap_err();
    assert!(matches!(err, DataError::Spreadsheet { .. }));
}
