//! Opposite-recommendation selector.
//!
//! Maps a user's dominant label to the label whose articles should be put in
//! front of them, then fetches the newest articles carrying it.

use rand_core::RngCore;

use crate::{
  Error, Result,
  article::Article,
  bias::BiasLabel,
  store::{ArticleQuery, NewsStore},
};

/// Pick the label opposite to `dominant`.
///
/// Left and right map to each other. Center has no natural opposite, so a
/// fair coin drawn from `rng` picks left or right.
pub fn select_opposite<R>(dominant: BiasLabel, rng: &mut R) -> BiasLabel
where
  R: RngCore + ?Sized,
{
  match dominant {
    BiasLabel::Left => BiasLabel::Right,
    BiasLabel::Right => BiasLabel::Left,
    BiasLabel::Center => {
      if rng.next_u32() & 1 == 0 {
        BiasLabel::Left
      } else {
        BiasLabel::Right
      }
    }
  }
}

/// Up to `limit` articles labelled `label`, newest first.
///
/// Fewer results than `limit` is not an error. A store failure surfaces as
/// [`Error::DataUnavailable`] so callers can tell it apart from zero matches.
pub async fn fetch_articles<S>(
  store: &S,
  label: BiasLabel,
  limit: usize,
) -> Result<Vec<Article>>
where
  S: NewsStore,
{
  let query = ArticleQuery { bias: Some(label), limit, ..Default::default() };
  store
    .latest_articles(&query)
    .await
    .map_err(Error::data_unavailable)
}

#[cfg(test)]
pub(crate) mod tests {
  use rand_core::{impls, Error as RandError};

  use super::*;

  /// SplitMix64; deterministic for a given seed.
  pub(crate) struct SplitMix(pub u64);

  impl RngCore for SplitMix {
    fn next_u32(&mut self) -> u32 { (self.next_u64() >> 32) as u32 }

    fn next_u64(&mut self) -> u64 {
      self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
      let mut z = self.0;
      z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
      z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
      z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) { impls::fill_bytes_via_next(self, dest) }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  /// Always yields the same word.
  pub(crate) struct Fixed(pub u32);

  impl RngCore for Fixed {
    fn next_u32(&mut self) -> u32 { self.0 }

    fn next_u64(&mut self) -> u64 { u64::from(self.0) }

    fn fill_bytes(&mut self, dest: &mut [u8]) { impls::fill_bytes_via_next(self, dest) }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  #[test]
  fn left_and_right_are_never_randomised() {
    let mut rng = SplitMix(7);
    for _ in 0..100 {
      assert_eq!(select_opposite(BiasLabel::Left, &mut rng), BiasLabel::Right);
      assert_eq!(select_opposite(BiasLabel::Right, &mut rng), BiasLabel::Left);
    }
  }

  #[test]
  fn center_follows_the_injected_coin() {
    assert_eq!(select_opposite(BiasLabel::Center, &mut Fixed(0)), BiasLabel::Left);
    assert_eq!(select_opposite(BiasLabel::Center, &mut Fixed(1)), BiasLabel::Right);
  }

  #[test]
  fn center_splits_roughly_evenly() {
    let mut rng = SplitMix(0x5EED);
    let trials = 10_000;
    let lefts = (0..trials)
      .filter(|_| select_opposite(BiasLabel::Center, &mut rng) == BiasLabel::Left)
      .count();
    // Five standard deviations either side of 5000.
    assert!((4750..=5250).contains(&lefts), "left picked {lefts} of {trials}");
  }

  #[test]
  fn center_never_yields_center() {
    let mut rng = SplitMix(42);
    for _ in 0..1_000 {
      assert_ne!(select_opposite(BiasLabel::Center, &mut rng), BiasLabel::Center);
    }
  }
}
