//! Story fixtures shared by the context test suites.

use std::sync::Arc;

use fablepath_content::domain::published::PublishedStory;
use fablepath_content::domain::story::{Choice, EndingType, StoryDefinition, StoryNode};

/// Two endings: `[0, 0]` scores 15 and ends good, `[1]` scores 0 and ends bad.
#[must_use]
pub fn garden_story() -> StoryDefinition {
    let mut story = StoryDefinition::new("garden", "The Secret Garden", "start")
        .with_node(
            StoryNode::branching(
                "start",
                "A little gate creaks open.",
                vec![
                    Choice::new("Step inside", "mid", 5),
                    Choice::new("Run home", "end_bad", 0),
                ],
            )
            .with_speaker("Narrator"),
        )
        .with_node(StoryNode::branching(
            "mid",
            "The flowers look thirsty.",
            vec![Choice::new("Water them", "end_good", 10)],
        ))
        .with_node(StoryNode::ending(
            "end_good",
            "The garden blooms.",
            EndingType::Good,
        ))
        .with_node(StoryNode::ending(
            "end_bad",
            "You never see the garden again.",
            EndingType::Bad,
        ));
    story.category = "nature".to_owned();
    story.moral = "Small kindnesses help things grow.".to_owned();
    story
}

/// Branching nodes that only lead to each other. Fails validation with
/// `NoTerminalReachable`.
#[must_use]
pub fn cyclic_story() -> StoryDefinition {
    StoryDefinition::new("carousel", "The Carousel", "horse")
        .with_node(StoryNode::branching(
            "horse",
            "Round and round on the horse.",
            vec![Choice::new("Switch to the swan", "swan", 1)],
        ))
        .with_node(StoryNode::branching(
            "swan",
            "Round and round on the swan.",
            vec![Choice::new("Switch to the horse", "horse", 1)],
        ))
}

/// The garden story plus an ending nothing points at.
#[must_use]
pub fn story_with_unreachable_node() -> StoryDefinition {
    garden_story().with_node(StoryNode::ending(
        "hidden_pond",
        "A pond no path leads to.",
        EndingType::Excellent,
    ))
}

/// One choice worth -3 points straight into a bad ending.
#[must_use]
pub fn muddy_path_story() -> StoryDefinition {
    StoryDefinition::new("muddy-path", "The Muddy Path", "start")
        .with_node(StoryNode::branching(
            "start",
            "A puddle blocks the way.",
            vec![Choice::new("Stomp through it", "splash", -3)],
        ))
        .with_node(StoryNode::ending(
            "splash",
            "Muddy boots everywhere.",
            EndingType::Bad,
        ))
}

/// The starting node is itself an ending.
#[must_use]
pub fn single_ending_story() -> StoryDefinition {
    StoryDefinition::new("nap", "The Nap", "dream").with_node(StoryNode::ending(
        "dream",
        "You dream of clouds.",
        EndingType::Great,
    ))
}

/// Publishes a fixture that is known to be valid.
///
/// # Panics
///
/// Panics if the fixture fails validation.
#[must_use]
pub fn publish(definition: &StoryDefinition) -> Arc<PublishedStory> {
    let (story, _) = PublishedStory::publish(definition).expect("fixture story is valid");
    Arc::new(story)
}

/// Published form of [`garden_story`].
#[must_use]
pub fn published_garden() -> Arc<PublishedStory> {
    publish(&garden_story())
}

/// Published form of [`muddy_path_story`].
#[must_use]
pub fn published_muddy_path() -> Arc<PublishedStory> {
    publish(&muddy_path_story())
}

/// Published form of [`single_ending_story`].
#[must_use]
pub fn published_single_ending() -> Arc<PublishedStory> {
    publish(&single_ending_story())
}
