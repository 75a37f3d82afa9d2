//! Built-in converter for JMA bulletin headers.
//!
//! Lifts the bulletin's control and head envelope into a flat JSON record.
//! This is the collaborator implementation wired into the shipped binary;
//! swapping in a richer converter only requires another [`RecordConverter`].

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

use crate::classify::Classification;
use crate::converter::RecordConverter;
use crate::error::{ConvertError, Result};

// JMA Control/Status values: 通常 (normal), 訓練 (drill), 試験 (test).
// Drill and test bulletins must not reach the sink.
const STATUS_NORMAL: &str = "通常";

/// Converts JMA seismic XML bulletins into header records.
pub struct JmaBulletinConverter;

impl RecordConverter for JmaBulletinConverter {
    fn convert(&self, classification: Classification, raw: &[u8]) -> Result<serde_json::Value> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| ConvertError::parse(format!("bulletin is not valid UTF-8: {e}")))?;
        let head = BulletinHead::parse(text)?;

        match classification {
            Classification::Quake | Classification::Tsunami => head.validate()?,
            // Early warnings ship without the validation pass.
            Classification::EarlyWarning => {}
            Classification::Unrecognized => return Err(ConvertError::Unrecognized),
        }

        Ok(serde_json::to_value(&head)?)
    }
}

/// Control and head envelope of a JMA bulletin.
#[derive(Debug, Default, Serialize)]
struct BulletinHead {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    editorial_office: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publishing_office: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info_type: Option<String>,
}

impl BulletinHead {
    fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        let mut head = BulletinHead::default();
        // Name of the innermost open element; only leaf text is captured.
        let mut current: Option<String> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    current = Some(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
                }
                Ok(Event::Text(text)) => {
                    if let Some(tag) = current.as_deref() {
                        let value = text
                            .unescape()
                            .map_err(|e| ConvertError::parse(format!("malformed bulletin XML: {e}")))?
                            .trim()
                            .to_string();
                        if !value.is_empty() {
                            head.record_field(tag, value);
                        }
                    }
                }
                Ok(Event::End(_)) => current = None,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(ConvertError::parse(format!("malformed bulletin XML: {e}")));
                }
            }
        }

        if head.title.is_none() && head.event_id.is_none() {
            return Err(ConvertError::parse(
                "no recognizable bulletin header".to_string(),
            ));
        }

        Ok(head)
    }

    // First occurrence wins; Control fields precede Head fields in the document.
    fn record_field(&mut self, tag: &str, value: String) {
        let slot = match tag {
            "Title" => &mut self.title,
            "DateTime" => &mut self.date_time,
            "Status" => &mut self.status,
            "EditorialOffice" => &mut self.editorial_office,
            "PublishingOffice" => &mut self.publishing_office,
            "ReportDateTime" => &mut self.report_datetime,
            "TargetDateTime" => &mut self.target_datetime,
            "EventID" => &mut self.event_id,
            "Serial" => &mut self.serial,
            "InfoKind" => &mut self.info_kind,
            "InfoType" => &mut self.info_type,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn validate(&self) -> Result<()> {
        let mandatory = [
            ("Control/Title", &self.title),
            ("Control/Status", &self.status),
            ("Head/EventID", &self.event_id),
            ("Head/ReportDateTime", &self.report_datetime),
        ];
        for (field, value) in mandatory {
            if value.is_none() {
                return Err(ConvertError::validation(format!(
                    "missing mandatory field {field}"
                )));
            }
        }

        if let Some(status) = self.status.as_deref() {
            if status != STATUS_NORMAL {
                return Err(ConvertError::warning(format!(
                    "bulletin status is {status:?}, not a normal operation bulletin"
                )));
            }
        }
        Ok(())
    }
}
