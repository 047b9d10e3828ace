pub mod evaluator;
pub mod ladder;
#[cfg(test)]
mod tests;

pub use evaluator::ThresholdEvaluator;
pub use ladder::Ladder;
