//! Plain-text rendering for the terminal.
//!
//! Labels are in Thai to match the forms the figures are copied into.

use shared::WorkingDayRecord;

use crate::domain::working_days::REFERENCE_YEAR;
use crate::domain::WorkingDaysView;

/// Holidays announced for the reference year, shown as a note under its result
const REFERENCE_YEAR_HOLIDAY_NAMES: &[&str] = &[
    "วันขึ้นปีใหม่ (1 ม.ค.)",
    "วันมาฆบูชา (12 ก.พ.)",
    "วันจักรี (6 เม.ย. ชดเชย 7 เม.ย.)",
    "วันสงกรานต์ (13-15 เม.ย. ชดเชย 16 เม.ย.)",
    "วันแรงงานแห่งชาติ (1 พ.ค.)",
    "วันฉัตรมงคล (4 พ.ค. ชดเชย 5 พ.ค.)",
    "วันวิสาขบูชา (11 พ.ค. ชดเชย 12 พ.ค.)",
    "วันหยุดพิเศษ (2 มิ.ย.)",
    "วันเฉลิมพระชนมพรรษาสมเด็จพระราชินี (3 มิ.ย.)",
    "วันอาสาฬหบูชา (10 ก.ค.)",
    "วันเข้าพรรษา (11 ก.ค.)",
    "วันเฉลิมพระชนมพรรษาพระบาทสมเด็จพระเจ้าอยู่หัว (28 ก.ค.)",
    "วันแม่แห่งชาติ (12 ส.ค.)",
    "วันนวมินทรมหาราช (13 ต.ค.)",
    "วันปิยมหาราช (23 ต.ค.)",
    "วันพ่อแห่งชาติ (5 ธ.ค.)",
    "วันรัฐธรรมนูญ (10 ธ.ค.)",
    "วันสิ้นปี (31 ธ.ค.)",
];

/// Parse a number typed by the user the way a form field does.
///
/// The leading integer is used and anything after it is ignored, so `2.5`
/// reads as 2 and `5 วัน` as 5. Input with no leading digits, or a value
/// outside the `i32` range, counts as 0.
pub fn parse_int_or_zero(input: &str) -> i32 {
    let trimmed = input.trim();
    let bytes = trimmed.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let digits = bytes[sign_len..].iter().take_while(|b| b.is_ascii_digit()).count();
    trimmed[..sign_len + digits].parse::<i32>().unwrap_or(0)
}

/// Named holidays behind the count for a year, if that year has them listed
pub fn holiday_note(year: i32) -> Option<&'static [&'static str]> {
    if year == REFERENCE_YEAR {
        Some(REFERENCE_YEAR_HOLIDAY_NAMES)
    } else {
        None
    }
}

pub fn render_working_days(record: &WorkingDayRecord) -> String {
    let mut lines = vec![
        format!("ปีงบประมาณ พ.ศ. {}", record.year),
        format!("  จำนวนวันทั้งปี:        {:>4} วัน", record.total_days),
        format!("  วันเสาร์-อาทิตย์:       {:>4} วัน", record.weekend_days),
        format!("  วันหยุดราชการ:         {:>4} วัน", record.holidays),
        format!("  วันหยุดเพิ่มเติม:        {:>4} วัน", record.additional_holidays),
        format!("  วันทำการ:              {:>4} วัน", record.working_days),
    ];

    if let Some(names) = holiday_note(record.year) {
        lines.push(format!("หมายเหตุ: วันหยุดราชการปี {} ได้แก่", record.year));
        lines.extend(names.iter().map(|name| format!("  - {}", name)));
    }

    lines.join("\n")
}

/// Render a year view, marking results that have not been saved yet
pub fn render_view(view: &WorkingDaysView) -> String {
    let status = match view.record.id {
        Some(id) if view.saved => format!("(บันทึกแล้ว #{})", id),
        _ => "(ยังไม่ได้บันทึก)".to_string(),
    };
    format!("{}\n{}", render_working_days(&view.record), status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkingDaysCalculator;

    #[test]
    fn test_parse_int_or_zero() {
        assert_eq!(parse_int_or_zero("2568"), 2568);
        assert_eq!(parse_int_or_zero(" 5 "), 5);
        assert_eq!(parse_int_or_zero("-3"), -3);
        assert_eq!(parse_int_or_zero(""), 0);
        assert_eq!(parse_int_or_zero("สอง"), 0);
        assert_eq!(parse_int_or_zero("2.5"), 2);
        assert_eq!(parse_int_or_zero("5 วัน"), 5);
        assert_eq!(parse_int_or_zero("+7"), 7);
        assert_eq!(parse_int_or_zero("-"), 0);
        assert_eq!(parse_int_or_zero("วัน 5"), 0);
        assert_eq!(parse_int_or_zero("99999999999"), 0);
    }

    #[test]
    fn test_holiday_note_only_for_reference_year() {
        assert!(holiday_note(2568).is_some());
        assert!(holiday_note(2567).is_none());
        assert!(holiday_note(2569).is_none());
    }

    #[test]
    fn test_render_reference_year_includes_note() {
        let record = WorkingDaysCalculator::new().compute_working_days(2568, 0);
        let text = render_working_days(&record);
        assert!(text.contains("พ.ศ. 2568"));
        assert!(text.contains(" 243 วัน"));
        assert!(text.contains("หมายเหตุ"));
        assert!(text.contains("วันสงกรานต์"));
    }

    #[test]
    fn test_render_other_year_has_no_note() {
        let record = WorkingDaysCalculator::new().compute_working_days(2572, 0);
        let text = render_working_days(&record);
        assert!(text.contains(" 245 วัน"));
        assert!(!text.contains("หมายเหตุ"));
    }

    #[test]
    fn test_render_view_marks_unsaved() {
        let record = WorkingDaysCalculator::new().compute_working_days(2572, 0);
        let unsaved = render_view(&WorkingDaysView { record: record.clone(), saved: false });
        assert!(unsaved.ends_with("(ยังไม่ได้บันทึก)"));

        let saved = render_view(&WorkingDaysView {
            record: WorkingDayRecord { id: Some(4), ..record },
            saved: true,
        });
        assert!(saved.ends_with("(บันทึกแล้ว #4)"));
    }
}
