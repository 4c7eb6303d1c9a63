use crate::error::LearningError;

/// Longest accepted student identifier
const MAX_STUDENT_ID_LEN: usize = 128;

/// Validate a student identifier
///
/// # Examples
/// ```
/// use gyan_learning::validation::validate_student_id;
///
/// assert!(validate_student_id("STU-1024").is_ok());
/// assert!(validate_student_id("  ").is_err());
/// ```
pub fn validate_student_id(student_id: &str) -> Result<(), LearningError> {
    if student_id.trim().is_empty() {
        return Err(LearningError::Validation(
            "Student id cannot be empty".to_string(),
        ));
    }

    if student_id.len() > MAX_STUDENT_ID_LEN {
        return Err(LearningError::Validation(format!(
            "Student id cannot exceed {MAX_STUDENT_ID_LEN} characters"
        )));
    }

    if student_id.chars().any(char::is_whitespace) {
        return Err(LearningError::Validation(format!(
            "Invalid student id: '{student_id}'. Must not contain whitespace"
        )));
    }

    Ok(())
}

/// Validate a graded result against the number of questions
pub fn validate_score(score: f64, total_questions: u32) -> Result<(), LearningError> {
    if !score.is_finite() || score < 0.0 {
        return Err(LearningError::Validation(
            "Score must be a non-negative number".to_string(),
        ));
    }

    if score > f64::from(total_questions) {
        return Err(LearningError::Validation(format!(
            "Score {score} exceeds the number of questions ({total_questions})"
        )));
    }

    Ok(())
}

/// Validate an optional duration in seconds
pub fn validate_duration(field: &str, seconds: Option<f64>) -> Result<(), LearningError> {
    match seconds {
        Some(s) if !s.is_finite() || s <= 0.0 => Err(LearningError::Validation(format!(
            "{field} must be greater than zero"
        ))),
        _ => Ok(()),
    }
}
