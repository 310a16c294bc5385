use rand::Rng;

use quiz_core::model::{Question, QuestionKind, QuizSettings};

use crate::shuffle;

/// Selection result for a pool build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolPlan {
    pub questions: Vec<Question>,
    pub text_selected: usize,
    pub image_selected: usize,
}

impl PoolPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions were selected for this session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Builds one session's question pool from the full corpus.
pub struct PoolBuilder<'a> {
    settings: &'a QuizSettings,
}

impl<'a> PoolBuilder<'a> {
    #[must_use]
    pub fn new(settings: &'a QuizSettings) -> Self {
        Self { settings }
    }

    /// Build a pool plan from the full question corpus.
    ///
    /// - Text questions are shuffled, then capped at the configured count.
    /// - Image questions (any non-text kind) are taken as a fixed prefix of
    ///   the corpus order, capped at the configured count. The prefix is
    ///   intentional: image sets are curated front-to-back.
    /// - The combined selection is shuffled so the kinds interleave.
    ///
    /// An empty corpus yields an empty plan; starting a session from one is
    /// the caller's error.
    pub fn build<R: Rng + ?Sized>(
        self,
        all_questions: impl IntoIterator<Item = Question>,
        rng: &mut R,
    ) -> PoolPlan {
        let text_cap = usize::try_from(self.settings.text_question_count()).unwrap_or(usize::MAX);
        let image_cap = usize::try_from(self.settings.image_question_count()).unwrap_or(usize::MAX);

        let mut text = Vec::new();
        let mut image = Vec::new();
        for question in all_questions {
            match question.kind() {
                QuestionKind::Text => text.push(question),
                QuestionKind::Image => image.push(question),
            }
        }

        shuffle::shuffle(&mut text, rng);
        text.truncate(text_cap);
        image.truncate(image_cap);

        let text_selected = text.len();
        let image_selected = image.len();

        let mut combined = image;
        combined.append(&mut text);
        shuffle::shuffle(&mut combined, rng);

        PoolPlan {
            questions: combined,
            text_selected,
            image_selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn text_question(id: u64) -> Question {
        Question::text(
            QuestionId::new(id),
            format!("Text question {id}"),
            "Right",
            ["Wrong 1", "Wrong 2", "Wrong 3"],
        )
        .unwrap()
    }

    fn image_question(id: u64) -> Question {
        Question::image(
            QuestionId::new(id),
            format!("https://example.com/quiz/{id}.png"),
            "Right",
            ["Wrong 1", "Wrong 2", "Wrong 3"],
        )
        .unwrap()
    }

    fn corpus(text: u64, image: u64) -> Vec<Question> {
        let mut all: Vec<Question> = (1..=text).map(text_question).collect();
        all.extend((101..=(100 + image)).map(image_question));
        all
    }

    #[test]
    fn selects_min_of_cap_and_available() {
        let settings = QuizSettings::standard();
        let mut rng = StdRng::seed_from_u64(1);

        let plan = PoolBuilder::new(&settings).build(corpus(12, 3), &mut rng);
        assert_eq!(plan.text_selected, 5);
        assert_eq!(plan.image_selected, 3);
        assert_eq!(plan.total(), 8);

        let plan = PoolBuilder::new(&settings).build(corpus(2, 9), &mut rng);
        assert_eq!(plan.text_selected, 2);
        assert_eq!(plan.image_selected, 5);
        assert_eq!(plan.total(), 7);
    }

    #[test]
    fn image_selection_is_a_fixed_prefix_of_corpus_order() {
        let settings = QuizSettings::standard();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = PoolBuilder::new(&settings).build(corpus(0, 9), &mut rng);

            let mut ids: Vec<u64> = plan.questions.iter().map(|q| q.id().value()).collect();
            ids.sort_unstable();
            // Always the first five image questions, whatever the final order.
            assert_eq!(ids, vec![101, 102, 103, 104, 105]);
        }
    }

    #[test]
    fn empty_corpus_yields_empty_plan() {
        let settings = QuizSettings::standard();
        let mut rng = StdRng::seed_from_u64(1);
        let plan = PoolBuilder::new(&settings).build(Vec::new(), &mut rng);
        assert!(plan.is_empty());
        assert_eq!(plan.text_selected, 0);
        assert_eq!(plan.image_selected, 0);
    }

    #[test]
    fn single_kind_corpus_yields_single_kind_pool() {
        let settings = QuizSettings::standard();
        let mut rng = StdRng::seed_from_u64(3);
        let plan = PoolBuilder::new(&settings).build(corpus(8, 0), &mut rng);
        assert_eq!(plan.image_selected, 0);
        assert_eq!(plan.total(), 5);
        assert!(
            plan.questions
                .iter()
                .all(|q| q.kind() == QuestionKind::Text)
        );
    }

    #[test]
    fn pool_mixes_both_kinds_when_available() {
        let settings = QuizSettings::standard();
        let mut rng = StdRng::seed_from_u64(4);
        let plan = PoolBuilder::new(&settings).build(corpus(10, 10), &mut rng);
        assert_eq!(plan.total(), 10);
        assert!(
            plan.questions
                .iter()
                .any(|q| q.kind() == QuestionKind::Text)
        );
        assert!(
            plan.questions
                .iter()
                .any(|q| q.kind() == QuestionKind::Image)
        );
    }
}
