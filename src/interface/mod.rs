pub mod prompts;
pub mod render;

pub use prompts::{
    collect_request, prompt_food_selection, prompt_optional_grams, prompt_targets,
    prompt_tolerance, prompt_yes_no,
};
pub use render::{display_assignment, display_food_list, display_nutrition};
