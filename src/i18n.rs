use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Vi,
}

/// User-facing labels. Question content itself is never translated.
#[derive(Debug)]
pub struct Labels {
    pub required_message: &'static str,
    pub missing_info: &'static str,
    pub answer_placeholder: &'static str,
    pub add_response: &'static str,
    pub response: &'static str,
    pub remove_response: &'static str,
    pub province: &'static str,
    pub district: &'static str,
    pub ward: &'static str,
    pub choose: &'static str,
    pub submit_title: &'static str,
    pub submitted: &'static str,
    pub responses_total: &'static str,
    pub questions_total: &'static str,
}

static EN: Labels = Labels {
    required_message: "This question is required.",
    missing_info: "Missing information",
    answer_placeholder: "Enter your answer",
    add_response: "Add response",
    response: "Response",
    remove_response: "remove",
    province: "Province",
    district: "District",
    ward: "Ward",
    choose: "Choose...",
    submit_title: "Submit your answers?",
    submitted: "Thank you, your answers were submitted.",
    responses_total: "Responses",
    questions_total: "Questions",
};

static VI: Labels = Labels {
    required_message: "Vui lòng trả lời câu hỏi này.",
    missing_info: "Thiếu thông tin",
    answer_placeholder: "Nhập câu trả lời",
    add_response: "Thêm câu trả lời",
    response: "Câu trả lời",
    remove_response: "xoá",
    province: "Tỉnh/Thành",
    district: "Quận/Huyện",
    ward: "Phường/Xã",
    choose: "Chọn...",
    submit_title: "Gửi câu trả lời?",
    submitted: "Cảm ơn, câu trả lời của bạn đã được gửi.",
    responses_total: "Tổng phản hồi",
    questions_total: "Tổng câu hỏi",
};

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Vi => &VI,
        }
    }
}
