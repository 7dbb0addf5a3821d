use super::*;
use proptest::prelude::*;

const SAMPLE_CSV: &str = "\
PlateId,ExcitationEmissionFilter,Well,ImageFileName,TimePoint,PositionZUm,PositionYUm,PositionXUm,AcquiredAt
7,DAPI,A01,img_A01_s1_w1.tif,0,1.5,200.25,100.5,2024-03-11 14:02:19
7,FITC,A01,img_A01_s1_w2.tif,0,1.5,200.25,100.5,2024-03-11 14:02:21
7,DAPI,A02,img_A02_s1_w1.tif,1,1.0,200.25,9100.5,2024-03-11 14:02:25
";

#[test]
fn test_canonical_column_order() {
    let table = ScanTable::from_bytes(SAMPLE_CSV.as_bytes()).unwrap();
    assert_eq!(
        table.headers(),
        [
            "ImageFileName",
            "Well",
            "PositionXUm",
            "PositionYUm",
            "PositionZUm",
            "ExcitationEmissionFilter",
            "PlateId",
            "TimePoint",
            "AcquiredAt",
        ]
    );
}

#[test]
fn test_row_data_unchanged() {
    let table = ScanTable::from_bytes(SAMPLE_CSV.as_bytes()).unwrap();
    assert_eq!(table.num_rows(), 3);
    assert_eq!(
        table.rows()[0],
        [
            "img_A01_s1_w1.tif",
            "A01",
            "100.5",
            "200.25",
            "1.5",
            "DAPI",
            "7",
            "0",
            "2024-03-11 14:02:19",
        ]
    );
    assert_eq!(table.column("PositionZUm").unwrap(), ["1.5", "1.5", "1.0"]);
}

#[test]
fn test_missing_required_column() {
    let csv = "ImageFileName,Well,PositionXUm,PositionYUm,PositionZUm\nimg.tif,A01,1,2,3\n";
    match ScanTable::from_bytes(csv.as_bytes()) {
        Err(TableError::MissingColumns(missing)) => {
            assert_eq!(missing, ["ExcitationEmissionFilter"]);
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn test_all_missing_columns_reported() {
    let err = ScanTable::from_bytes(b"Well,Other\nA01,x\n").unwrap_err();
    match err {
        TableError::MissingColumns(missing) => assert_eq!(
            missing,
            [
                "ImageFileName",
                "PositionXUm",
                "PositionYUm",
                "PositionZUm",
                "ExcitationEmissionFilter",
            ]
        ),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_column_names_are_case_sensitive() {
    let csv = "imagefilename,Well,PositionXUm,PositionYUm,PositionZUm,ExcitationEmissionFilter\n";
    let err = ScanTable::from_bytes(csv.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("ImageFileName"));
}

#[test]
fn test_header_only_table() {
    let csv = "Well,ImageFileName,PositionXUm,PositionYUm,PositionZUm,ExcitationEmissionFilter\n";
    let table = ScanTable::from_bytes(csv.as_bytes()).unwrap();
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.headers()[0], "ImageFileName");
}

#[test]
fn test_ragged_rows_are_rejected() {
    let csv = "ImageFileName,Well,PositionXUm,PositionYUm,PositionZUm,ExcitationEmissionFilter\na,b,1,2,3\n";
    assert!(matches!(
        ScanTable::from_bytes(csv.as_bytes()),
        Err(TableError::CsvError(_))
    ));
}

#[test]
fn test_column_kinds() {
    let table = ScanTable::from_bytes(SAMPLE_CSV.as_bytes()).unwrap();
    assert_eq!(table.column_kind("PlateId").unwrap(), ColumnKind::Integer);
    assert_eq!(table.column_kind("PositionXUm").unwrap(), ColumnKind::Float);
    assert_eq!(table.column_kind("AcquiredAt").unwrap(), ColumnKind::Text);
    assert!(matches!(
        table.column_kind("Nope"),
        Err(TableError::UnknownColumn(_))
    ));
}

#[test]
fn test_unique_values_in_first_seen_order() {
    let table = ScanTable::from_bytes(SAMPLE_CSV.as_bytes()).unwrap();
    assert_eq!(
        table.unique_values("ExcitationEmissionFilter").unwrap(),
        ["DAPI", "FITC"]
    );
    assert_eq!(table.unique_values("Well").unwrap(), ["A01", "A02"]);
}

#[test]
fn test_filter_text_column() {
    let table = ScanTable::from_bytes(SAMPLE_CSV.as_bytes()).unwrap();
    let filtered = table.filter_eq("ExcitationEmissionFilter", "DAPI").unwrap();
    assert_eq!(filtered.num_rows(), 2);
    assert_eq!(filtered.headers(), table.headers());
    assert_eq!(
        filtered.column("ImageFileName").unwrap(),
        ["img_A01_s1_w1.tif", "img_A02_s1_w1.tif"]
    );
}

#[test]
fn test_filter_numeric_column_compares_numbers() {
    let table = ScanTable::from_bytes(SAMPLE_CSV.as_bytes()).unwrap();
    assert_eq!(table.filter_eq("PositionZUm", "1").unwrap().num_rows(), 1);
    assert_eq!(table.filter_eq("PositionZUm", "1.50").unwrap().num_rows(), 2);
    assert_eq!(table.filter_eq("PositionZUm", "abc").unwrap().num_rows(), 0);
}

#[test]
fn test_export_filtered_view() {
    let table = ScanTable::from_bytes(SAMPLE_CSV.as_bytes()).unwrap();
    let filtered = table.filter_eq("Well", "A02").unwrap();
    let text = String::from_utf8(filtered.to_csv_bytes().unwrap()).unwrap();
    assert_eq!(
        text,
        "ImageFileName,Well,PositionXUm,PositionYUm,PositionZUm,ExcitationEmissionFilter,PlateId,TimePoint,AcquiredAt\n\
         img_A02_s1_w1.tif,A02,9100.5,200.25,1.0,DAPI,7,1,2024-03-11 14:02:25\n"
    );

    let reread = ScanTable::from_bytes(text.as_bytes()).unwrap();
    assert_eq!(reread, filtered);
}

#[test]
fn test_filtered_file_name() {
    assert_eq!(filtered_file_name("Well", "A01"), "filtered_Well_A01.csv");
    assert_eq!(filtered_file_name("Path", "a/b\\c"), "filtered_Path_a_b_c.csv");
}

fn shuffled_headers() -> impl Strategy<Value = Vec<String>> {
    let extras = proptest::collection::btree_set("[a-z]{1,8}", 0..6);
    extras
        .prop_map(|extras| {
            let mut headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect();
            headers.extend(extras);
            headers
        })
        .prop_shuffle()
}

proptest! {
    #[test]
    fn prop_required_columns_first_extras_in_order(headers in shuffled_headers()) {
        let row: Vec<String> = headers.iter().map(|h| format!("v_{}", h)).collect();
        let csv = format!("{}\n{}\n", headers.join(","), row.join(","));

        let table = ScanTable::from_bytes(csv.as_bytes()).unwrap();

        let extras: Vec<&String> = headers
            .iter()
            .filter(|h| !REQUIRED_COLUMNS.contains(&h.as_str()))
            .collect();
        let mut expected: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        expected.extend(extras.iter().map(|s| s.as_str()));

        prop_assert_eq!(table.headers(), expected.as_slice());
        for (header, cell) in table.headers().iter().zip(&table.rows()[0]) {
            prop_assert_eq!(cell, &format!("v_{}", header));
        }
        prop_assert_eq!(ScanTable::from_bytes(csv.as_bytes()).unwrap(), table);
    }
}

fn generated_csv() -> impl Strategy<Value = Vec<u8>> {
    shuffled_headers()
        .prop_flat_map(|headers| {
            let cell = "[A-Za-z0-9 ,.\"_-]{0,6}";
            let rows = proptest::collection::vec(
                proptest::collection::vec(cell, headers.len()),
                0..8,
            );
            (Just(headers), rows)
        })
        .prop_map(|(headers, rows)| {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(&headers).unwrap();
            for row in &rows {
                writer.write_record(row).unwrap();
            }
            writer.into_inner().unwrap()
        })
}

proptest! {
    #[test]
    fn prop_extraction_is_idempotent(csv in generated_csv()) {
        let first = ScanTable::from_bytes(&csv).unwrap();
        let second = ScanTable::from_bytes(&csv).unwrap();
        prop_assert_eq!(&first, &second);

        // An exported table reads back unchanged
        let exported = first.to_csv_bytes().unwrap();
        prop_assert_eq!(ScanTable::from_bytes(&exported).unwrap(), first);
    }
}
