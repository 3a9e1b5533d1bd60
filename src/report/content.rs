//! Fixed report wording in both languages.

use super::i18n::{Bilingual, Language};
use super::snapshot::{ChecklistGroup, ChecklistItem, ChecklistVariant, FormSnapshot};

pub type Text = Bilingual<&'static str>;

pub const TITLE: Text = Bilingual::new("Pump Service Report", "รายงานการบริการปั๊ม");

pub const COMPANY_NAME: Text = Bilingual::new(
    "Siam Pump Services Co., Ltd.",
    "บริษัท สยาม ปั๊ม เซอร์วิส จำกัด",
);

pub const COMPANY_ADDRESS: [Text; 3] = [
    Bilingual::new(
        "88/8 Moo 4, Bangna-Trad Road Km. 23",
        "88/8 หมู่ 4 ถนนบางนา-ตราด กม. 23",
    ),
    Bilingual::new(
        "Bang Sao Thong, Samut Prakan 10570",
        "ตำบลบางเสาธง อำเภอบางเสาธง จังหวัดสมุทรปราการ 10570",
    ),
    Bilingual::new(
        "Tel. 02-123-4567  service@siampump.co.th",
        "โทร. 02-123-4567  service@siampump.co.th",
    ),
];

pub const DOC_NUMBER_LABEL: Text = Bilingual::new("Doc. No.:", "เลขที่เอกสาร:");
pub const REVISION_LABEL: Text = Bilingual::new("Rev.:", "แก้ไขครั้งที่:");
pub const DATE_LABEL: Text = Bilingual::new("Date:", "วันที่:");

pub const CUSTOMER_HEADING: Text = Bilingual::new("Customer Details", "ข้อมูลลูกค้า");
pub const PUMP_HEADING: Text = Bilingual::new("Pump Information", "ข้อมูลปั๊ม");
pub const CONDITIONS_HEADING: Text = Bilingual::new("Operating Conditions", "สภาวะการทำงาน");
pub const SERVICE_REASON_LABEL: Text = Bilingual::new("Reason for Service:", "สาเหตุที่เข้ารับบริการ:");
pub const NOTES_HEADING: Text = Bilingual::new("Important Notes", "ข้อควรทราบ");

/// Placeholder for an empty field.
pub const PLACEHOLDER: &str = "-";

pub fn customer_fields(s: &FormSnapshot) -> [(Text, &str); 6] {
    [
        (Bilingual::new("Company:", "บริษัท:"), &s.company),
        (Bilingual::new("Site Location:", "สถานที่ติดตั้ง:"), &s.site_location),
        (Bilingual::new("Contact Person:", "ผู้ติดต่อ:"), &s.contact_person),
        (Bilingual::new("Department:", "แผนก:"), &s.department),
        (Bilingual::new("Phone:", "โทรศัพท์:"), &s.phone),
        (Bilingual::new("Email:", "อีเมล:"), &s.email),
    ]
}

pub fn pump_fields(s: &FormSnapshot) -> [(Text, &str); 6] {
    [
        (Bilingual::new("Pump Model:", "รุ่นปั๊ม:"), &s.pump_model),
        (Bilingual::new("Serial Number:", "หมายเลขเครื่อง:"), &s.serial_number),
        (Bilingual::new("Year of Manufacture:", "ปีที่ผลิต:"), &s.manufacture_year),
        (Bilingual::new("Operating Hours:", "ชั่วโมงการทำงาน:"), &s.operating_hours),
        (Bilingual::new("Last Service Date:", "วันที่บริการครั้งล่าสุด:"), &s.last_service_date),
        (Bilingual::new("Installation Date:", "วันที่ติดตั้ง:"), &s.installation_date),
    ]
}

pub fn condition_fields(s: &FormSnapshot) -> [(Text, &str); 6] {
    [
        (Bilingual::new("Temperature:", "อุณหภูมิ:"), &s.temperature),
        (Bilingual::new("Flow Rate:", "อัตราการไหล:"), &s.flow_rate),
        (Bilingual::new("Suction Pressure:", "แรงดันด้านดูด:"), &s.suction_pressure),
        (Bilingual::new("Discharge Pressure:", "แรงดันด้านจ่าย:"), &s.discharge_pressure),
        (Bilingual::new("Total Head:", "เฮดรวม:"), &s.total_head),
        (Bilingual::new("Pumped Medium:", "ของเหลวที่สูบ:"), &s.pumped_medium),
    ]
}

pub fn group_heading(group: ChecklistGroup) -> Text {
    match group {
        ChecklistGroup::Preparation => {
            Bilingual::new("Pump Preparation Checklist", "รายการตรวจสอบการเตรียมปั๊ม")
        }
        ChecklistGroup::PreService => {
            Bilingual::new("Pre-Service Checklist", "รายการตรวจสอบก่อนเข้าให้บริการ")
        }
    }
}

pub fn item_label(item: ChecklistItem) -> Text {
    use ChecklistItem::*;
    match item {
        PumpIsolated => Bilingual::new(
            "Pump isolated from the process (valves closed)",
            "แยกปั๊มออกจากระบบแล้ว (ปิดวาล์ว)",
        ),
        Drained => Bilingual::new("Pump casing drained", "ระบายของเหลวออกจากตัวเรือนปั๊มแล้ว"),
        Cooled => Bilingual::new(
            "Pump cooled to a safe handling temperature",
            "ปั๊มเย็นลงถึงอุณหภูมิที่ปลอดภัยแล้ว",
        ),
        PowerDisconnected => Bilingual::new(
            "Motor power disconnected and verified",
            "ตัดไฟมอเตอร์และตรวจสอบแล้ว",
        ),
        Decontaminated => Bilingual::new(
            "Pump cleaned and decontaminated",
            "ทำความสะอาดและขจัดสารปนเปื้อนแล้ว",
        ),
        SpareParts => Bilingual::new("Spare parts available on site", "มีอะไหล่พร้อมที่หน้างาน"),
        Documentation => Bilingual::new(
            "Pump drawings and manuals available",
            "มีแบบและคู่มือปั๊มพร้อม",
        ),
        LiftingPoints => Bilingual::new(
            "Lifting equipment and lifting points checked",
            "ตรวจสอบอุปกรณ์ยกและจุดยกแล้ว",
        ),
        FoundationAccess => Bilingual::new(
            "Clear access to pump and foundation",
            "มีพื้นที่เข้าถึงปั๊มและฐานรากสะดวก",
        ),
        SafetyTraining => Bilingual::new(
            "Site safety training completed",
            "ผ่านการอบรมความปลอดภัยของพื้นที่แล้ว",
        ),
        Ppe => Bilingual::new(
            "Personal protective equipment provided",
            "มีอุปกรณ์ป้องกันส่วนบุคคลพร้อม",
        ),
        LockoutTagout => Bilingual::new(
            "Lockout/tagout applied",
            "ดำเนินการล็อกและติดป้ายแล้ว",
        ),
        WorkPermit => Bilingual::new("Work permit issued", "ออกใบอนุญาตทำงานแล้ว"),
        SiteAccess => Bilingual::new(
            "Site access and escort arranged",
            "จัดเตรียมการเข้าพื้นที่และผู้นำทางแล้ว",
        ),
        ToolsReady => Bilingual::new(
            "Tools and test equipment ready",
            "เครื่องมือและอุปกรณ์ทดสอบพร้อม",
        ),
    }
}

const HOURS_UNIT: Text = Bilingual::new("hours", "ชั่วโมง");

/// The label for `item`, with the training hours appended to the safety
/// training item when they are given.
pub fn checklist_label(item: ChecklistItem, training_hours: &str, language: Language) -> String {
    let label = *item_label(item).pick(language);
    let hours = training_hours.trim();
    let zero = hours.parse::<f64>().map(|h| h == 0.0).unwrap_or(false);
    if item == ChecklistItem::SafetyTraining && !hours.is_empty() && !zero {
        format!("{} ({} {})", label, hours, HOURS_UNIT.pick(language))
    } else {
        label.to_string()
    }
}

const PRE_SERVICE_NOTES: [Text; 6] = [
    Bilingual::new(
        "All personnel must attend the site safety induction before starting work.",
        "ผู้ปฏิบัติงานทุกคนต้องเข้ารับการปฐมนิเทศความปลอดภัยก่อนเริ่มงาน",
    ),
    Bilingual::new(
        "Personal protective equipment must be worn at all times in the work area.",
        "ต้องสวมอุปกรณ์ป้องกันส่วนบุคคลตลอดเวลาในพื้นที่ปฏิบัติงาน",
    ),
    Bilingual::new(
        "Energy sources must be locked out and tagged before the pump is opened.",
        "ต้องล็อกและติดป้ายแหล่งพลังงานก่อนเปิดปั๊ม",
    ),
    Bilingual::new(
        "Work may only begin once a valid work permit has been issued.",
        "เริ่มงานได้เมื่อได้รับใบอนุญาตทำงานที่ถูกต้องแล้วเท่านั้น",
    ),
    Bilingual::new(
        "The customer must report any hazardous media in the pump before service.",
        "ลูกค้าต้องแจ้งสารอันตรายที่อยู่ในปั๊มก่อนเข้าให้บริการ",
    ),
    Bilingual::new(
        "Service may be postponed if the site is not ready on the agreed date.",
        "อาจเลื่อนการให้บริการหากพื้นที่ไม่พร้อมในวันที่นัดหมาย",
    ),
];

const FULL_NOTES: [Text; 7] = [
    Bilingual::new(
        "All personnel must attend the site safety induction before starting work.",
        "ผู้ปฏิบัติงานทุกคนต้องเข้ารับการปฐมนิเทศความปลอดภัยก่อนเริ่มงาน",
    ),
    Bilingual::new(
        "Personal protective equipment must be worn at all times in the work area.",
        "ต้องสวมอุปกรณ์ป้องกันส่วนบุคคลตลอดเวลาในพื้นที่ปฏิบัติงาน",
    ),
    Bilingual::new(
        "The pump must be isolated, drained and cooled before our technicians arrive.",
        "ต้องแยกปั๊ม ระบายของเหลว และทำให้เย็นลงก่อนช่างของเราเข้าพื้นที่",
    ),
    Bilingual::new(
        "Energy sources must be locked out and tagged before the pump is opened.",
        "ต้องล็อกและติดป้ายแหล่งพลังงานก่อนเปิดปั๊ม",
    ),
    Bilingual::new(
        "Safety data sheets must be provided for any hazardous pumped medium.",
        "ต้องจัดเตรียมเอกสารข้อมูลความปลอดภัยสำหรับของเหลวอันตรายที่สูบ",
    ),
    Bilingual::new(
        "Lifting equipment must be certified and suitable for the pump weight.",
        "อุปกรณ์ยกต้องผ่านการรับรองและเหมาะสมกับน้ำหนักปั๊ม",
    ),
    Bilingual::new(
        "Additional charges apply if the site is not ready on the agreed date.",
        "มีค่าใช้จ่ายเพิ่มเติมหากพื้นที่ไม่พร้อมในวันที่นัดหมาย",
    ),
];

pub fn notes(variant: ChecklistVariant) -> &'static [Text] {
    match variant {
        ChecklistVariant::PreServiceOnly => &PRE_SERVICE_NOTES,
        ChecklistVariant::Full => &FULL_NOTES,
    }
}

pub const AUTHOR: &str = "Siam Pump Services Co., Ltd.";
pub const SUBJECT: &str = "Pump service visit report";
pub const KEYWORDS: &str = "pump, service, maintenance, checklist";

/// Shown to the user whenever a report could not be produced.
pub const FAILURE_NOTICE: &str = "Could not generate the PDF report. Please try again. / \
     ไม่สามารถสร้างรายงาน PDF ได้ กรุณาลองใหม่อีกครั้ง";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_hours_suffix() {
        assert_eq!(
            checklist_label(ChecklistItem::SafetyTraining, "8", Language::English),
            "Site safety training completed (8 hours)"
        );
        assert_eq!(
            checklist_label(ChecklistItem::SafetyTraining, " 8 ", Language::Thai),
            "ผ่านการอบรมความปลอดภัยของพื้นที่แล้ว (8 ชั่วโมง)"
        );
    }

    #[test]
    fn no_empty_parentheses() {
        for hours in ["", "   ", "0"] {
            let label = checklist_label(ChecklistItem::SafetyTraining, hours, Language::English);
            assert!(!label.contains('('), "unexpected suffix for {:?}: {}", hours, label);
        }
    }

    #[test]
    fn hours_only_qualify_safety_training() {
        assert!(!checklist_label(ChecklistItem::Ppe, "8", Language::English).contains("hours"));
    }

    #[test]
    fn notes_lists_differ_by_variant() {
        assert_eq!(notes(ChecklistVariant::PreServiceOnly).len(), 6);
        assert_eq!(notes(ChecklistVariant::Full).len(), 7);
    }

    #[test]
    fn every_label_has_distinct_translations() {
        for item in ChecklistVariant::Full.items() {
            let label = item_label(item);
            assert_ne!(label.en, label.th);
        }
        let form = FormSnapshot::default();
        let fields = customer_fields(&form)
            .into_iter()
            .chain(pump_fields(&form))
            .chain(condition_fields(&form));
        for (label, _) in fields {
            assert_ne!(label.en, label.th);
        }
    }
}
