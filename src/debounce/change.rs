/// Reports whether a watched value differs from the last one observed.
///
/// The first observation is the mount: it records the baseline and never
/// counts as a change, so loading initial values does not trigger a save.
#[derive(Debug, Clone)]
pub struct ChangeDetector<T> {
    last: Option<T>,
}

impl<T: PartialEq + Clone> ChangeDetector<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Records `value` and returns true if it changed since the previous call.
    pub fn observe(&mut self, value: &T) -> bool {
        match &self.last {
            None => {
                self.last = Some(value.clone());
                false
            }
            Some(last) if last == value => false,
            Some(_) => {
                self.last = Some(value.clone());
                true
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.last.is_some()
    }
}

impl<T: PartialEq + Clone> Default for ChangeDetector<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_not_a_change() {
        let mut detector = ChangeDetector::new();
        assert!(!detector.is_mounted());
        assert!(!detector.observe(&"initial".to_string()));
        assert!(detector.is_mounted());
    }

    #[test]
    fn same_value_is_not_a_change() {
        let mut detector = ChangeDetector::new();
        detector.observe(&(true, "30".to_string()));
        assert!(!detector.observe(&(true, "30".to_string())));
    }

    #[test]
    fn different_value_is_a_change_once() {
        let mut detector = ChangeDetector::new();
        detector.observe(&1);
        assert!(detector.observe(&2));
        assert!(!detector.observe(&2));
        assert!(detector.observe(&1));
    }
}
