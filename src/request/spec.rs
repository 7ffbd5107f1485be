use super::Request;

/// One request or an arbitrarily nested group of them.
///
/// A [`RequestSpec::Single`] is always a one-element batch. It is never iterated into.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestSpec {
    Single(Request),
    Group(Vec<RequestSpec>),
}

impl RequestSpec {
    /// Flatten depth-first, left to right.
    pub fn flatten(self) -> Vec<Request> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(spec) = stack.pop() {
            match spec {
                RequestSpec::Single(request) => out.push(request),
                RequestSpec::Group(children) => stack.extend(children.into_iter().rev()),
            }
        }
        out
    }

    /// Number of requests after flattening.
    pub fn len(&self) -> usize {
        match self {
            RequestSpec::Single(_) => 1,
            RequestSpec::Group(children) => children.iter().map(RequestSpec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Request> for RequestSpec {
    fn from(request: Request) -> Self {
        RequestSpec::Single(request)
    }
}

impl<T: Into<RequestSpec>> From<Vec<T>> for RequestSpec {
    fn from(items: Vec<T>) -> Self {
        RequestSpec::Group(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RequestSpec>, const N: usize> From<[T; N]> for RequestSpec {
    fn from(items: [T; N]) -> Self {
        RequestSpec::Group(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RequestSpec>> FromIterator<T> for RequestSpec {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        RequestSpec::Group(iter.into_iter().map(Into::into).collect())
    }
}

/// Build a [`RequestSpec`] group from mixed items: single requests, vectors, arrays or
/// nested specs.
///
/// ```rust
/// use requests_batch::{get, requests};
///
/// let spec = requests![
///     get("http://localhost/a"),
///     vec![get("http://localhost/b"), get("http://localhost/c")],
/// ];
/// assert_eq!(spec.len(), 3);
/// ```
#[macro_export]
macro_rules! requests {
    ($($item:expr),* $(,)?) => {
        $crate::request::RequestSpec::Group(vec![
            $($crate::request::RequestSpec::from($item)),*
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{get, post};

    fn urls(spec: RequestSpec) -> Vec<String> {
        spec.flatten()
            .into_iter()
            .map(|r| r.url().to_string())
            .collect()
    }

    #[test]
    fn test_single_is_one_element() {
        let spec = RequestSpec::from(get("http://h/0"));
        assert_eq!(spec.len(), 1);
        assert_eq!(urls(spec), vec!["http://h/0"]);
    }

    #[test]
    fn test_nested_flatten_is_depth_first() {
        let spec = crate::requests![
            get("http://h/0"),
            vec![
                RequestSpec::from(get("http://h/1")),
                RequestSpec::from(vec![get("http://h/2"), get("http://h/3")]),
            ],
            [post("http://h/4")],
            Vec::<Request>::new(),
            get("http://h/5"),
        ];
        assert_eq!(spec.len(), 6);
        assert_eq!(
            urls(spec),
            vec![
                "http://h/0",
                "http://h/1",
                "http://h/2",
                "http://h/3",
                "http://h/4",
                "http://h/5"
            ]
        );
    }

    #[test]
    fn test_empty_group() {
        let spec: RequestSpec = Vec::<Request>::new().into();
        assert!(spec.is_empty());
        assert!(spec.flatten().is_empty());
    }

    #[test]
    fn test_from_iterator() {
        let spec: RequestSpec = (0..3).map(|i| get(format!("http://h/{}", i))).collect();
        assert_eq!(urls(spec), vec!["http://h/0", "http://h/1", "http://h/2"]);
    }
}
