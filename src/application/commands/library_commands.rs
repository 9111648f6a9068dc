// src/application/commands/library_commands.rs

use crate::application::{dto::*, error_handling::ToErrorResponse, state::AppState};

/// The currently published library view
pub fn get_library_view(state: &AppState) -> Result<LibraryViewDto, String> {
    let view = state.library_view.current_view();
    Ok(LibraryViewDto::from_view(
        &view,
        state.library_view.is_degraded(),
    ))
}

pub fn get_view_criteria(state: &AppState) -> Result<CriteriaDto, String> {
    Ok(CriteriaDto::from(&state.library_view.criteria()))
}

/// Replace the full criteria (filters, sort and search)
pub fn set_view_criteria(state: &AppState, criteria: CriteriaDto) -> Result<(), String> {
    state
        .library_view
        .update_criteria(criteria.to_criteria())
        .to_error_response()
}

/// Keystroke entry point; keeps every other criteria field
pub fn set_search_text(state: &AppState, text: String) -> Result<(), String> {
    let criteria = state.library_view.criteria().with_search_text(text);
    state
        .library_view
        .update_criteria(criteria)
        .to_error_response()
}

/// Force a recomputation (e.g. pull-to-refresh)
pub fn refresh_library_view(state: &AppState) -> Result<(), String> {
    state.library_view.refresh().to_error_response()
}
