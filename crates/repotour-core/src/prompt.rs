//! Onboarding prompt for the guided tour.

use crate::domain::{KeyElements, Result};
use crate::filter::FilterPolicy;

/// How many tree paths are shown to the model.
pub const TREE_SAMPLE_LIMIT: usize = 200;

const TOUR_INSTRUCTIONS: &str = "You are a senior software engineer onboarding a new developer.

Create a **Guided Developer Tour**.

Include:
1. What the project is
2. What problem it solves
3. Who it is for
4. Architecture overview
5. Key files & directories
6. First steps for contributors
";

/// First [`TREE_SAMPLE_LIMIT`] paths outside ignored subtrees.
pub fn tree_sample<'a, I>(paths: I, policy: &FilterPolicy) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    paths
        .into_iter()
        .filter(|p| !p.split('/').any(|segment| policy.is_ignored_dir(segment)))
        .take(TREE_SAMPLE_LIMIT)
        .collect()
}

pub fn build_tour_prompt(readme: &str, tree_sample: &[&str], key: &KeyElements) -> Result<String> {
    let mut prompt = String::with_capacity(readme.len() + tree_sample.len() * 32 + 1024);
    prompt.push_str(TOUR_INSTRUCTIONS);

    prompt.push_str("\nREADME:\n");
    prompt.push_str(readme.trim_end());
    prompt.push('\n');

    prompt.push_str("\nRepository structure (sample):\n");
    for path in tree_sample {
        prompt.push_str("- ");
        prompt.push_str(path);
        prompt.push('\n');
    }

    prompt.push_str("\nKey elements:\n");
    prompt.push_str(&key.to_prompt_json()?);
    prompt.push('\n');

    Ok(prompt)
}
