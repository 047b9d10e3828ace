//! Ordered "try this, else that" cascades.

/// Run each selector in order and return the first answer.
pub fn first_available<T>(selectors: &[&dyn Fn() -> Option<T>]) -> Option<T> {
    selectors.iter().find_map(|select| select())
}

/// Return the first preference for which `lookup` yields a value, paired with that preference.
pub fn first_preferred<'a, P: ?Sized, T>(
    preferences: impl IntoIterator<Item = &'a P>,
    mut lookup: impl FnMut(&'a P) -> Option<T>,
) -> Option<(&'a P, T)>
where
    P: 'a,
{
    preferences
        .into_iter()
        .find_map(|pref| lookup(pref).map(|value| (pref, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_available_stops_at_first_hit() {
        let calls = std::cell::Cell::new(0);
        let miss = || {
            calls.set(calls.get() + 1);
            None
        };
        let hit = || {
            calls.set(calls.get() + 1);
            Some(7)
        };
        let never = || -> Option<i32> { panic!("should not run") };

        assert_eq!(first_available(&[&miss, &hit, &never]), Some(7));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_first_available_all_miss() {
        let miss = || -> Option<u8> { None };
        assert_eq!(first_available(&[&miss, &miss]), None);
    }

    #[test]
    fn test_first_preferred_returns_matching_field() {
        let fields = ["YLD_YTM_MID", "YLD_YTM_LAST", "PX_LAST"];
        let found = first_preferred(fields.iter().copied(), |f: &str| {
            (f == "PX_LAST").then_some(3.1)
        });
        assert_eq!(found, Some(("PX_LAST", 3.1)));
    }
}
