use serde::Serialize;

use crate::{
    booking::resolver::{OpenSlots, SlotCondition},
    protocol::Severity,
};

#[derive(Default, Serialize)]
pub struct SearchTeacherItem {
    pub id: String,
    pub name: String,
}

#[derive(Default, Serialize)]
pub struct SearchTeacherResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub teachers: Vec<SearchTeacherItem>,
}

#[derive(Default, Serialize)]
pub struct OpenSlotsResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub condition: Option<SlotCondition>,
    pub notice: String,
    pub slots: Vec<String>,
}

impl From<OpenSlots> for OpenSlotsResponse {
    fn from(open: OpenSlots) -> Self {
        let severity = match open.condition {
            SlotCondition::Open => Severity::Success,
            _ => Severity::Warning,
        };
        Self {
            success: true,
            err: "".to_string(),
            severity,
            condition: Some(open.condition),
            notice: open.condition.notice().to_string(),
            slots: open.slots,
        }
    }
}

crate::impl_err_response! {
    SearchTeacherResponse,
    OpenSlotsResponse,
}
