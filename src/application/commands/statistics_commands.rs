// src/application/commands/statistics_commands.rs

use crate::application::{dto::*, error_handling::ToErrorResponse, state::AppState};

/// Recalculate and return library statistics
pub fn get_library_statistics(state: &AppState) -> Result<LibraryStatisticsDto, String> {
    state
        .statistics_service
        .calculate()
        .map(LibraryStatisticsDto::from)
        .to_error_response()
}
