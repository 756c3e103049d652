//! Form variant catalog
//!
//! Each signup form is an ordered list of [`Question`]s built by a plain
//! function. The two music-performance forms share one parameterised builder.

use crate::models::event::{Event, EventContext};
use crate::services::FormServices;
use crate::utils::errors::{Result, VolunteerError};
use super::controller::FormController;
use super::question::{Question, QuestionKind};
use super::validators;
use super::value::{FieldValue, FormValues};

/// Question names, shared with the form id table
pub mod field {
    pub const FULL_NAME: &str = "fullName";
    pub const EMAIL: &str = "email";
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const AGE: &str = "age";
    pub const PARENTAL_CONSENT: &str = "parentalConsent";
    pub const PERFORMANCE_TYPE: &str = "performanceType";
    pub const INSTRUMENT: &str = "instrument";
    pub const PIECES: &str = "pieces";
    pub const PERFORMANCE_LENGTH: &str = "performanceLength";
    pub const RECORDING_LINK: &str = "recordingLink";
    pub const ENSEMBLE_ROSTER: &str = "ensembleRoster";
    pub const PHOTO_RELEASE: &str = "photoRelease";
    pub const AGREEMENT: &str = "agreement";
    pub const ORGANIZATION: &str = "organizationName";
    pub const VENUE_ADDRESS: &str = "venueAddress";
    pub const AUDIENCE_SIZE: &str = "audienceSize";
    pub const TIME_SLOTS: &str = "timeSlots";
    pub const MUSIC_PREFERENCES: &str = "musicPreferences";
    pub const NOTES: &str = "notes";
    pub const DANCE_STYLE: &str = "danceStyle";
    pub const FAVORITE_SONGS: &str = "favoriteSongs";
}

/// Volunteers under this age need a guardian's consent
pub const ADULT_AGE: f64 = 18.0;

/// Dance club sets have no performance type selector
pub const DANCE_CLUB_TIME_LIMIT: u32 = 10;

pub const FAVORITE_SONG_COUNT: usize = 4;

const YES_NO: [&str; 2] = ["Yes", "No"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormVariant {
    LibraryMusicHour,
    MusicByTheTracks,
    RequestConcert,
    DanceClub,
}

impl FormVariant {
    pub const ALL: [FormVariant; 4] = [
        FormVariant::LibraryMusicHour,
        FormVariant::MusicByTheTracks,
        FormVariant::RequestConcert,
        FormVariant::DanceClub,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FormVariant::LibraryMusicHour => "Library Music Hour",
            FormVariant::MusicByTheTracks => "Music by the Tracks",
            FormVariant::RequestConcert => "Request a Concert",
            FormVariant::DanceClub => "Dance Club",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        let title = title.trim();
        Self::ALL.into_iter().find(|variant| variant.title() == title)
    }

    /// Form that signs a volunteer up for this event
    pub fn for_event(event: &Event) -> Option<Self> {
        Self::from_title(&event.title)
    }

    /// Ordered questions for this form
    pub fn questions(self) -> Vec<Question> {
        match self {
            FormVariant::LibraryMusicHour => music_performance_questions(MusicFormParams {
                default_time_limit: 10,
                include_ensemble_upload: true,
            }),
            FormVariant::MusicByTheTracks => music_performance_questions(MusicFormParams {
                default_time_limit: 15,
                include_ensemble_upload: false,
            }),
            FormVariant::RequestConcert => concert_request_questions(),
            FormVariant::DanceClub => dance_club_questions(),
        }
    }
}

/// Performance categories and their time limits in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceType {
    Solo,
    Duet,
    Trio,
    Ensemble,
    FullSet,
}

impl PerformanceType {
    pub const ALL: [PerformanceType; 5] = [
        PerformanceType::Solo,
        PerformanceType::Duet,
        PerformanceType::Trio,
        PerformanceType::Ensemble,
        PerformanceType::FullSet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PerformanceType::Solo => "Solo",
            PerformanceType::Duet => "Duet",
            PerformanceType::Trio => "Trio",
            PerformanceType::Ensemble => "Ensemble",
            PerformanceType::FullSet => "Full Set",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    pub fn time_limit_minutes(self) -> u32 {
        match self {
            PerformanceType::Solo => 8,
            PerformanceType::Duet => 12,
            PerformanceType::Trio => 15,
            PerformanceType::Ensemble => 20,
            PerformanceType::FullSet => 60,
        }
    }

    fn selected(values: &FormValues) -> Option<Self> {
        values
            .get(field::PERFORMANCE_TYPE)
            .as_str()
            .and_then(Self::from_label)
    }
}

/// What differs between the two music-performance forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicFormParams {
    /// Minutes allowed before a performance type is picked
    pub default_time_limit: u32,
    pub include_ensemble_upload: bool,
}

fn options(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

fn is_minor(values: &FormValues) -> bool {
    values
        .get(field::AGE)
        .as_number()
        .map_or(false, |age| age < ADULT_AGE)
}

fn contact_questions() -> Vec<Question> {
    vec![
        Question::new(field::FULL_NAME, "Full name", QuestionKind::Text).validate(validators::full_name),
        Question::new(field::EMAIL, "Email", QuestionKind::Text).validate(validators::email),
        Question::new(field::PHONE_NUMBER, "Phone number", QuestionKind::Text)
            .validate(validators::phone_number),
    ]
}

fn age_questions() -> Vec<Question> {
    vec![
        Question::new(field::AGE, "Age", QuestionKind::Number).validate(validators::age),
        Question::new(
            field::PARENTAL_CONSENT,
            "A parent or guardian consents to my participation",
            QuestionKind::Checkbox,
        )
        .validate(validators::consent_given)
        .visible_when(is_minor),
    ]
}

fn agreement_question() -> Question {
    Question::new(
        field::AGREEMENT,
        "I agree to arrive on time and follow venue rules",
        QuestionKind::Checkbox,
    )
    .validate(validators::consent_given)
}

pub fn music_performance_questions(params: MusicFormParams) -> Vec<Question> {
    let default_limit = params.default_time_limit;
    let performance_labels: Vec<&str> = PerformanceType::ALL.iter().map(|kind| kind.label()).collect();

    let mut questions = contact_questions();
    questions.extend(age_questions());
    questions.extend([
        Question::new(
            field::PERFORMANCE_TYPE,
            "Performance type",
            QuestionKind::SingleChoice(options(&performance_labels)),
        )
        .validate(validators::answered),
        Question::new(field::INSTRUMENT, "Instrument(s)", QuestionKind::Text).validate(validators::required_text),
        Question::new(field::PIECES, "Pieces you plan to perform", QuestionKind::LongText)
            .validate(validators::required_text),
        Question::new(field::PERFORMANCE_LENGTH, "Performance length (minutes)", QuestionKind::Number)
            .validate_with(move |value, values| {
                let limit = PerformanceType::selected(values)
                    .map_or(default_limit, PerformanceType::time_limit_minutes);
                validators::performance_length(value, limit)
            }),
        Question::new(field::RECORDING_LINK, "Link to a recording", QuestionKind::Text).validate(validators::link),
    ]);

    if params.include_ensemble_upload {
        questions.push(
            Question::new(field::ENSEMBLE_ROSTER, "Ensemble member list", QuestionKind::Upload)
                .validate(validators::required_upload)
                .visible_when(|values| PerformanceType::selected(values) == Some(PerformanceType::Ensemble)),
        );
    }

    questions.push(
        Question::new(
            field::PHOTO_RELEASE,
            "May we photograph your performance?",
            QuestionKind::SingleChoice(options(&YES_NO)),
        )
        .validate(validators::answered),
    );
    questions.push(agreement_question());
    questions
}

pub fn concert_request_questions() -> Vec<Question> {
    let mut questions = contact_questions();
    questions.extend([
        Question::new(field::ORGANIZATION, "Organization", QuestionKind::Text).validate(validators::required_text),
        Question::new(field::VENUE_ADDRESS, "Venue address", QuestionKind::Text)
            .validate(validators::required_text),
        Question::new(field::AUDIENCE_SIZE, "Expected audience size", QuestionKind::Number).validate(|value| {
            matches!(value, FieldValue::Empty) || value.as_number().map_or(false, |size| size > 0.0)
        }),
        Question::new(field::TIME_SLOTS, "Preferred time slots", QuestionKind::TimeSlots)
            .validate(validators::time_slots),
        Question::new(
            field::MUSIC_PREFERENCES,
            "Music preferences",
            QuestionKind::MultiChoice(options(&["Classical", "Jazz", "Pop", "Folk", "No preference"])),
        )
        .validate(validators::answered),
        Question::new(field::NOTES, "Anything else we should know?", QuestionKind::LongText),
    ]);
    questions
}

pub fn dance_club_questions() -> Vec<Question> {
    let mut questions = contact_questions();
    questions.extend(age_questions());
    questions.extend([
        Question::new(
            field::DANCE_STYLE,
            "Dance style",
            QuestionKind::SingleChoice(options(&["Swing", "Salsa", "Ballroom", "Hip Hop", "Line Dance"])),
        )
        .validate(validators::answered),
        Question::new(
            field::FAVORITE_SONGS,
            "Four songs you would like to dance to",
            QuestionKind::TextGroup { size: FAVORITE_SONG_COUNT },
        )
        .validate(|value| validators::text_group(value, FAVORITE_SONG_COUNT)),
        Question::new(field::PERFORMANCE_LENGTH, "Set length (minutes)", QuestionKind::Number)
            .validate(|value| validators::performance_length(value, DANCE_CLUB_TIME_LIMIT)),
        agreement_question(),
    ]);
    questions
}

/// Controller for one form instance at an event
pub fn build_form(variant: FormVariant, context: EventContext, services: FormServices) -> FormController {
    FormController::new(variant.title(), context, variant.questions(), services)
}

/// Controller for the form matching `title`
pub fn build_form_for_title(title: &str, context: EventContext, services: FormServices) -> Result<FormController> {
    let variant = FormVariant::from_title(title).ok_or_else(|| VolunteerError::UnknownForm {
        title: title.to_string(),
    })?;
    Ok(build_form(variant, context, services))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(questions: &[Question]) -> Vec<&str> {
        questions.iter().map(Question::name).collect()
    }

    fn find<'a>(questions: &'a [Question], name: &str) -> &'a Question {
        questions.iter().find(|q| q.name() == name).unwrap()
    }

    #[test]
    fn test_title_round_trip() {
        for variant in FormVariant::ALL {
            assert_eq!(FormVariant::from_title(variant.title()), Some(variant));
        }
        assert_eq!(FormVariant::from_title("Bake Sale"), None);
    }

    #[test]
    fn test_music_variants_differ_only_in_upload() {
        let hour = FormVariant::LibraryMusicHour.questions();
        let tracks = FormVariant::MusicByTheTracks.questions();
        let hour_names: Vec<&str> = names(&hour)
            .into_iter()
            .filter(|name| *name != field::ENSEMBLE_ROSTER)
            .collect();

        assert!(names(&hour).contains(&field::ENSEMBLE_ROSTER));
        assert_eq!(hour_names, names(&tracks));
    }

    #[test]
    fn test_performance_length_follows_selected_type() {
        let questions = FormVariant::LibraryMusicHour.questions();
        let length = find(&questions, field::PERFORMANCE_LENGTH);

        let values = FormValues::new().with(field::PERFORMANCE_LENGTH, FieldValue::text("10"));
        assert!(length.effective_validate(&values));

        let values = values.with(field::PERFORMANCE_TYPE, FieldValue::choice("Solo"));
        assert!(!length.effective_validate(&values));

        let values = values.with(field::PERFORMANCE_TYPE, FieldValue::choice("Full Set"));
        assert!(length.effective_validate(&values));
    }

    #[test]
    fn test_default_limit_per_variant() {
        let values = FormValues::new().with(field::PERFORMANCE_LENGTH, FieldValue::text("12"));
        let hour = FormVariant::LibraryMusicHour.questions();
        let tracks = FormVariant::MusicByTheTracks.questions();

        assert!(!find(&hour, field::PERFORMANCE_LENGTH).effective_validate(&values));
        assert!(find(&tracks, field::PERFORMANCE_LENGTH).effective_validate(&values));
    }

    #[test]
    fn test_ensemble_upload_only_required_for_ensembles() {
        let questions = FormVariant::LibraryMusicHour.questions();
        let roster = find(&questions, field::ENSEMBLE_ROSTER);

        let values = FormValues::new().with(field::PERFORMANCE_TYPE, FieldValue::choice("Duet"));
        assert!(!roster.is_visible(&values));
        assert!(roster.effective_validate(&values));

        let values = values.with(field::PERFORMANCE_TYPE, FieldValue::choice("Ensemble"));
        assert!(roster.is_visible(&values));
        assert!(!roster.effective_validate(&values));
    }

    #[test]
    fn test_parental_consent_only_for_minors() {
        let questions = FormVariant::DanceClub.questions();
        let consent = find(&questions, field::PARENTAL_CONSENT);

        let minor = FormValues::new().with(field::AGE, FieldValue::text("16"));
        assert!(!consent.effective_validate(&minor));

        let adult = FormValues::new().with(field::AGE, FieldValue::text("20"));
        assert!(consent.effective_validate(&adult));
    }

    #[test]
    fn test_concert_request_has_time_slots() {
        let questions = FormVariant::RequestConcert.questions();
        assert_eq!(
            find(&questions, field::TIME_SLOTS).kind(),
            &QuestionKind::TimeSlots
        );
        assert!(!names(&questions).contains(&field::AGE));

        let audience = find(&questions, field::AUDIENCE_SIZE);
        assert!(audience.effective_validate(&FormValues::new()));
        assert!(!audience.effective_validate(&FormValues::new().with(field::AUDIENCE_SIZE, FieldValue::text("0"))));
    }

    #[test]
    fn test_dance_club_group_size() {
        let questions = FormVariant::DanceClub.questions();
        assert_eq!(
            find(&questions, field::FAVORITE_SONGS).kind(),
            &QuestionKind::TextGroup { size: FAVORITE_SONG_COUNT }
        );
        assert!(!names(&questions).contains(&field::PERFORMANCE_TYPE));

        let length = find(&questions, field::PERFORMANCE_LENGTH);
        let values = FormValues::new().with(field::PERFORMANCE_LENGTH, FieldValue::text("11"));
        assert!(!length.effective_validate(&values));
    }
}
