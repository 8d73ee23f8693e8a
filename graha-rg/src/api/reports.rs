//! Report generation endpoints
//!
//! **[RG-API-010]** One request per report type. Validation failures return
//! 400 before any provider call; critical-data absence returns 422; success
//! returns the PDF with attachment headers plus generation metadata headers
//! so callers can observe partial-data degradation without parsing the
//! document.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::render::{
    self, generate_horoscope, generate_match, HoroscopeInputs, MatchInputs, ReportArtifact,
};
use crate::scoring;
use crate::services::aggregator::{aggregate, aggregate_pair};
use crate::services::catalog::{HOROSCOPE_FACTS, MATCH_PAIR_FACTS, MATCH_SUBJECT_FACTS};
use crate::AppState;
use graha_common::{Gender, Language, SubjectParams};

/// Subject parameters as received over the wire
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectDto {
    pub name: String,
    /// "male" or "female"
    pub gender: String,
    /// Birth date, `YYYY-MM-DD`
    pub date: String,
    /// Birth time, `HH:MM` (seconds accepted)
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    /// UTC offset in hours
    pub tzone: f64,
    pub place: Option<String>,
}

impl SubjectDto {
    /// Parse and validate into pipeline parameters
    fn into_params(self) -> ApiResult<SubjectParams> {
        let gender = match self.gender.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            other => {
                return Err(ApiError::BadRequest(format!(
                    "gender must be male or female, got {:?}",
                    other
                )))
            }
        };

        let birth_date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("invalid date {:?}", self.date)))?;

        let time = self.time.trim();
        let birth_time = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|_| ApiError::BadRequest(format!("invalid time {:?}", self.time)))?;

        let params = SubjectParams {
            name: self.name.trim().to_string(),
            gender,
            birth_date,
            birth_time,
            latitude: self.latitude,
            longitude: self.longitude,
            tz_offset_hours: self.tzone,
            place: self.place.unwrap_or_default(),
        };
        params.validate()?;
        Ok(params)
    }
}

fn parse_language(language: Option<&str>) -> ApiResult<Language> {
    match language {
        None => Ok(Language::default()),
        Some(s) => Ok(s.parse()?),
    }
}

/// Single-subject horoscope request
#[derive(Debug, Deserialize)]
pub struct HoroscopeRequest {
    pub subject: SubjectDto,
    pub language: Option<String>,
}

/// Dual-subject match request
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub groom: SubjectDto,
    pub bride: SubjectDto,
    pub language: Option<String>,
}

/// Wrap a rendered artifact as a binary attachment response
fn pdf_response(artifact: ReportArtifact) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    headers.insert(
        "X-Report-Status",
        HeaderValue::from_static(artifact.meta.status.as_str()),
    );
    let rate = format!("{:.2}", artifact.meta.success_rate());
    if let Ok(value) = HeaderValue::from_str(&rate) {
        headers.insert("X-Fact-Success-Rate", value);
    }

    (headers, artifact.bytes).into_response()
}

/// POST /api/report/horoscope
pub async fn horoscope_report(
    State(state): State<AppState>,
    Json(request): Json<HoroscopeRequest>,
) -> ApiResult<Response> {
    let language = parse_language(request.language.as_deref())?;
    let subject = request.subject.into_params()?;

    let (bag, completeness) =
        aggregate(state.provider.as_ref(), &subject, HOROSCOPE_FACTS).await;

    if !render::can_render(completeness.status) {
        return Err(ApiError::UnprocessableReport(format!(
            "critical facts unavailable: {}",
            completeness.failed_names.join(", ")
        )));
    }

    let inputs = HoroscopeInputs {
        subject: &subject,
        bag: &bag,
        completeness: &completeness,
        language,
        generated_on: Utc::now().date_naive(),
    };
    let artifact = generate_horoscope(&inputs, &state.assets);

    Ok(pdf_response(artifact))
}

/// POST /api/report/match
pub async fn match_report(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> ApiResult<Response> {
    let language = parse_language(request.language.as_deref())?;
    let groom = request.groom.into_params()?;
    let bride = request.bride.into_params()?;

    // The three aggregations are independent; run them concurrently
    let provider = state.provider.as_ref();
    let ((groom_bag, groom_completeness), (bride_bag, bride_completeness), (pair_bag, pair_completeness)) = tokio::join!(
        aggregate(provider, &groom, MATCH_SUBJECT_FACTS),
        aggregate(provider, &bride, MATCH_SUBJECT_FACTS),
        aggregate_pair(provider, &groom, &bride, MATCH_PAIR_FACTS),
    );

    for (name, completeness) in [(&groom.name, &groom_completeness), (&bride.name, &bride_completeness)] {
        if !render::can_render(completeness.status) {
            return Err(ApiError::UnprocessableReport(format!(
                "critical facts unavailable for {}: {}",
                name,
                completeness.failed_names.join(", ")
            )));
        }
    }

    let compat = scoring::evaluate(&groom_bag, &bride_bag, &pair_bag);

    let inputs = MatchInputs {
        groom: &groom,
        bride: &bride,
        groom_bag: &groom_bag,
        bride_bag: &bride_bag,
        pair_bag: &pair_bag,
        groom_completeness: &groom_completeness,
        bride_completeness: &bride_completeness,
        pair_completeness: &pair_completeness,
        compat: &compat,
        language,
        generated_on: Utc::now().date_naive(),
    };
    let artifact = generate_match(&inputs, &state.assets);

    Ok(pdf_response(artifact))
}

/// Build report routes
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/api/report/horoscope", post(horoscope_report))
        .route("/api/report/match", post(match_report))
}
