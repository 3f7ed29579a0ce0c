// ==========================================
// 代课覆盖表系统 - 端到端流程测试
// ==========================================
// 流程: 报表更新 → 清洗着色 → 人工录入 → 再清洗
// ==========================================


use daily_coverage::domain::types::{COVERAGE_HEADER, NSN};
use daily_coverage::domain::{CellCoord, FillColor, RowWarning};
use daily_coverage::repository::SheetStore;
use test_helpers::{cells, create_test_api, seed_sample_sheets};

#[test]
fn test_update_from_report_builds_coverage_sheet() {
    daily_coverage::logging::init_test();
    let (_tmp, store, api) = create_test_api();
    seed_sample_sheets(store.as_ref(), api.config());

    let response = api.update_from_report().unwrap();

    assert_eq!(response.rows_written, 3);
    assert_eq!(response.matched, 2);
    assert_eq!(
        response.report_warnings,
        vec![RowWarning::TeacherNotFound {
            row_index: 3,
            teacher: "Unknown, Person".to_string()
        }]
    );
    assert!(response.schedule_warnings.is_empty());

    let sheet = store.read_all("daily_coverage").unwrap();
    assert_eq!(sheet.len(), 4);
    assert_eq!(sheet[0], cells(&COVERAGE_HEADER));
    assert_eq!(
        sheet[1],
        cells(&[
            "Smith, John", "HR 101", "Algebra", "Prep", "Geometry", "Lunch", "Algebra", "w/ Lee",
            "Duty/Plan", "Calc", "", "Jane Sub", "Full Day",
        ])
    );
    // 报表路径始终整日投影，时长文本照抄
    assert_eq!(sheet[2][0], "Doe, Jane");
    assert_eq!(sheet[2][10], "Bio");
    assert_eq!(sheet[2][12], "Half Day AM");
    // 未匹配: 保留姓名，课节留空
    assert_eq!(
        sheet[3],
        cells(&["Unknown, Person", "", "", "", "", "", "", "", "", "", "", "Pat Sub", "Full Day"])
    );
}

#[test]
fn test_clean_generalizes_and_highlights() {
    let (_tmp, store, api) = create_test_api();
    seed_sample_sheets(store.as_ref(), api.config());
    api.update_from_report().unwrap();

    let response = api.clean_daily_coverage().unwrap();
    assert!(response.cleaned);
    assert_eq!(response.rows, 3);
    assert_eq!(response.highlighted_cells, 6);

    let sheet = store.read_all("daily_coverage").unwrap();
    assert_eq!(
        sheet[1],
        cells(&[
            "Smith, John", "sub", "sub", "Prep", "sub", "Lunch", "sub", "w/ Lee", "Duty/Plan",
            "sub", "", "Jane Sub", "Full Day",
        ])
    );

    let fills = store.read_fills("daily_coverage").unwrap();
    let coords: Vec<CellCoord> = fills.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        coords,
        vec![
            CellCoord::new(1, 3),
            CellCoord::new(1, 5),
            CellCoord::new(1, 8),
            CellCoord::new(2, 4),
            CellCoord::new(2, 6),
            CellCoord::new(2, 9),
        ]
    );
    assert!(fills.iter().all(|(_, color)| *color == FillColor::DARK_GRAY));
}

#[test]
fn test_clean_twice_is_stable() {
    let (_tmp, store, api) = create_test_api();
    seed_sample_sheets(store.as_ref(), api.config());
    api.update_from_report().unwrap();

    api.clean_daily_coverage().unwrap();
    let once = store.read_all("daily_coverage").unwrap();
    let fills_once = store.read_fills("daily_coverage").unwrap();

    api.clean_daily_coverage().unwrap();
    assert_eq!(store.read_all("daily_coverage").unwrap(), once);
    assert_eq!(store.read_fills("daily_coverage").unwrap(), fills_once);
}

#[test]
fn test_update_after_clean_drops_highlights() {
    let (_tmp, store, api) = create_test_api();
    seed_sample_sheets(store.as_ref(), api.config());
    api.update_from_report().unwrap();
    api.clean_daily_coverage().unwrap();
    assert_eq!(store.read_fills("daily_coverage").unwrap().len(), 6);

    api.update_from_report().unwrap();

    assert!(store.read_fills("daily_coverage").unwrap().is_empty());
    assert_eq!(store.read_all("daily_coverage").unwrap()[1][1], "HR 101");
}

#[test]
fn test_clean_moves_empty_rows_to_bottom_sorted() {
    let (_tmp, store, api) = create_test_api();
    store
        .overwrite(
            "daily_coverage",
            &[
                cells(&COVERAGE_HEADER),
                cells(&["Zed, Z"]),
                cells(&["Baker, B", "Algebra"]),
                cells(&["Adams, A"]),
            ],
        )
        .unwrap();

    api.clean_daily_coverage().unwrap();

    let names: Vec<String> = store
        .column_values("daily_coverage", 0)
        .unwrap()
        .into_iter()
        .skip(1)
        .collect();
    assert_eq!(names, ["Baker, B", "Adams, A", "Zed, Z"]);

    // 回写后每行补齐为 13 列
    assert!(store
        .read_all("daily_coverage")
        .unwrap()
        .iter()
        .all(|row| row.len() == 13));
}

#[test]
fn test_manual_absence_half_day_pm() {
    let (_tmp, store, api) = create_test_api();
    seed_sample_sheets(store.as_ref(), api.config());
    api.update_from_report().unwrap();

    let response = api
        .add_manual_absence("Garcia, Maria", "Half Day PM", &[], "Sam Sub")
        .unwrap();

    assert!(response.matched);
    assert!(response.warnings.is_empty());
    assert_eq!(response.row_index, 4);
    assert_eq!(
        response.row,
        cells(&[
            "Garcia, Maria", NSN, NSN, NSN, NSN, NSN, NSN, "", "", "Spanish", "Spanish", "Sam Sub",
            "Half Day PM",
        ])
    );

    let sheet = store.read_all("daily_coverage").unwrap();
    assert_eq!(sheet.len(), 5);
    assert_eq!(sheet[4], response.row);
}

#[test]
fn test_manual_absence_selected_periods() {
    let (_tmp, store, api) = create_test_api();
    seed_sample_sheets(store.as_ref(), api.config());

    let periods = cells(&["HR", "3"]);
    let response = api
        .add_manual_absence("Doe, Jane", "Period", &periods, "")
        .unwrap();

    // 覆盖表原本为空: 先写表头
    assert_eq!(response.row_index, 1);
    assert_eq!(
        response.row,
        cells(&[
            "Doe, Jane", "HR 102", NSN, NSN, "Plan/Duty", NSN, NSN, NSN, NSN, NSN, NSN, "", "Period",
        ])
    );
}

#[test]
fn test_manual_absence_requires_exact_name() {
    let (_tmp, store, api) = create_test_api();
    seed_sample_sheets(store.as_ref(), api.config());

    // 模糊匹配可命中，精确匹配不命中
    let response = api
        .add_manual_absence("Smith, Jon", "Full Day", &[], "")
        .unwrap();

    assert!(!response.matched);
    assert!(response.row[1..11].iter().all(|c| c == NSN));
    assert!(matches!(
        response.warnings.as_slice(),
        [RowWarning::TeacherNotFound { teacher, .. }] if teacher == "Smith, Jon"
    ));
}

#[test]
fn test_teacher_names_from_teacher_list() {
    let (_tmp, store, api) = create_test_api();
    store
        .overwrite(
            "teacher_list",
            &[cells(&["Name"]), cells(&["Smith, John"]), cells(&["Doe, Jane", "x"])],
        )
        .unwrap();

    assert_eq!(api.teacher_names().unwrap(), ["Smith, John", "Doe, Jane"]);
}
