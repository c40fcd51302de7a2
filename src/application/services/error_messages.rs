//! User-facing Arabic messages for API failures.

use crate::domain::errors::ApiError;

const NETWORK: &str = "تعذر الاتصال بالخادم، تحقق من اتصالك بالإنترنت";
const TIMEOUT: &str = "انتهت مهلة الطلب، حاول مرة أخرى";
const SESSION_EXPIRED: &str = "انتهت الجلسة، يرجى تسجيل الدخول مرة أخرى";
const STORAGE: &str = "تعذر حفظ البيانات على هذا الجهاز";
const DECODE: &str = "استجابة غير متوقعة من الخادم";
const CONFIGURATION: &str = "إعدادات الاتصال بالخادم غير صحيحة";
const UNKNOWN: &str = "حدث خطأ غير متوقع";

/// Message for a status code, ignoring any server-provided text.
#[must_use]
pub const fn status_message(status: u16) -> &'static str {
    match status {
        400 => "البيانات المرسلة غير صالحة",
        401 => "غير مصرح، يرجى تسجيل الدخول",
        403 => "ليس لديك صلاحية للقيام بهذا الإجراء",
        404 => "العنصر المطلوب غير موجود",
        409 => "يوجد تعارض مع بيانات موجودة",
        413 => "حجم الملف كبير جداً",
        422 => "تعذر معالجة البيانات المرسلة",
        429 => "طلبات كثيرة جداً، حاول لاحقاً",
        500 => "خطأ في الخادم، حاول لاحقاً",
        502..=504 => "الخادم غير متاح حالياً، حاول لاحقاً",
        _ => UNKNOWN,
    }
}

/// Localized text to show the user for `error`.
///
/// The server's own message wins for 400, 409 and 422, where it names the
/// offending field; every other status uses the fixed text.
#[must_use]
pub fn user_message(error: &ApiError) -> String {
    match error {
        ApiError::Network { .. } => NETWORK.to_string(),
        ApiError::Timeout => TIMEOUT.to_string(),
        ApiError::NoRefreshToken => SESSION_EXPIRED.to_string(),
        ApiError::Status { status, .. } => match (status, error.server_message()) {
            (400 | 409 | 422, Some(message)) => message.to_string(),
            _ => status_message(*status).to_string(),
        },
        ApiError::Validation { message } => message.clone(),
        ApiError::Decode { .. } => DECODE.to_string(),
        ApiError::Storage(_) => STORAGE.to_string(),
        ApiError::Configuration { .. } => CONFIGURATION.to_string(),
    }
}
