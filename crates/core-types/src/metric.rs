use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A derived value that may be undefined.
///
/// `Undefined` means the input did not carry enough information to compute the
/// value (short history, a missing field, a zero denominator). It is distinct from
/// zero and from a supplier failure, which travels as an error instead.
///
/// Serializes as the bare value or `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric<T> {
    Value(T),
    Undefined,
}

impl<T> Metric<T> {
    pub fn is_defined(&self) -> bool {
        matches!(self, Metric::Value(_))
    }

    pub fn is_undefined(&self) -> bool {
        !self.is_defined()
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Metric<U> {
        match self {
            Metric::Value(v) => Metric::Value(f(v)),
            Metric::Undefined => Metric::Undefined,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Metric<U>>(self, f: F) -> Metric<U> {
        match self {
            Metric::Value(v) => f(v),
            Metric::Undefined => Metric::Undefined,
        }
    }
}

impl Metric<f64> {
    /// Wraps a floating-point result, mapping NaN and infinities to `Undefined`.
    pub fn finite(value: f64) -> Self {
        if value.is_finite() {
            Metric::Value(value)
        } else {
            Metric::Undefined
        }
    }
}

impl<T> Default for Metric<T> {
    fn default() -> Self {
        Metric::Undefined
    }
}

impl<T> From<Option<T>> for Metric<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Metric::Value(v),
            None => Metric::Undefined,
        }
    }
}

impl<T> From<Metric<T>> for Option<T> {
    fn from(value: Metric<T>) -> Self {
        value.into_option()
    }
}

impl<T: Serialize> Serialize for Metric<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Metric<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Metric::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_are_undefined() {
        assert_eq!(Metric::finite(f64::NAN), Metric::Undefined);
        assert_eq!(Metric::finite(f64::INFINITY), Metric::Undefined);
        assert_eq!(Metric::finite(0.0), Metric::Value(0.0));
    }

    #[test]
    fn serializes_as_value_or_null() {
        let defined = serde_json::to_string(&Metric::Value(1.5)).unwrap();
        let undefined = serde_json::to_string(&Metric::<f64>::Undefined).unwrap();
        assert_eq!(defined, "1.5");
        assert_eq!(undefined, "null");

        let back: Metric<f64> = serde_json::from_str("null").unwrap();
        assert!(back.is_undefined());
    }
}
