use core::fmt;

use url::Url;

const SEP: char = '/';

/// Server URI that API paths are appended to.
#[derive(Clone)]
pub struct Resource {
    url: Url,
}

impl Resource {
    #[must_use]
    pub fn new(uri: &str) -> Option<Resource> {
        let base = Url::parse(uri).ok()?;
        Some(Resource { url: base })
    }

    /// Appends `path` segment by segment. A trailing separator in `path` is kept.
    pub fn append_path(&mut self, path: &str) -> &mut Self {
        let trailing = path.ends_with(SEP);
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(path.split(SEP).filter(|x| !x.is_empty()));
            if trailing {
                segments.push("");
            }
        }
        self
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_correct_some() {
        // Act
        let r = Resource::new("http://localhost");

        // Assert
        assert!(r.is_some());
    }

    #[test]
    fn new_incorrect_none() {
        // Act
        let r = Resource::new("http/localhost");

        // Assert
        assert!(r.is_none());
    }

    #[rstest]
    #[case("http://localhost", "x", "http://localhost/x")]
    #[case("http://localhost", "/x", "http://localhost/x")]
    #[case("http://localhost", "/x/", "http://localhost/x/")]
    #[case("http://localhost/", "x/y", "http://localhost/x/y")]
    #[case("http://localhost/x", "y", "http://localhost/x/y")]
    #[case("http://localhost/x/", "/y", "http://localhost/x/y")]
    #[case("http://localhost:5000", "api/upload", "http://localhost:5000/api/upload")]
    #[case("http://localhost:5000/", "/api/health", "http://localhost:5000/api/health")]
    #[trace]
    fn append_path_tests(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        // Arrange
        let mut r = Resource::new(base).unwrap();

        // Act
        r.append_path(path);

        // Assert
        assert_eq!(r.to_string().as_str(), expected);
    }

    #[test]
    fn append_path_twice() {
        // Arrange
        let mut r = Resource::new("http://localhost").unwrap();

        // Act
        r.append_path("api").append_path("upload");

        // Assert
        assert_eq!(r.to_string().as_str(), "http://localhost/api/upload");
    }
}
