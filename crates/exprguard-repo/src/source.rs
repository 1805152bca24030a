use exprguard_types::ExpressionSite;

/// Anything that can hand over expression sites: a source tree scanner, a fixed list,
/// a config file.
pub trait ExpressionSource {
    fn discover(&self) -> anyhow::Result<Vec<ExpressionSite>>;
}

/// A caller-supplied list of sites, returned as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticSource {
    sites: Vec<ExpressionSite>,
}

impl StaticSource {
    pub fn new(sites: Vec<ExpressionSite>) -> Self {
        Self { sites }
    }

    pub fn from_triples<'a, I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>, &'a str)>,
    {
        Self::new(
            triples
                .into_iter()
                .map(|(owner, member, expression)| ExpressionSite::new(owner, member, expression))
                .collect(),
        )
    }

    pub fn push(&mut self, site: ExpressionSite) {
        self.sites.push(site);
    }
}

impl ExpressionSource for StaticSource {
    fn discover(&self) -> anyhow::Result<Vec<ExpressionSite>> {
        Ok(self.sites.clone())
    }
}

impl<T: ExpressionSource + ?Sized> ExpressionSource for &T {
    fn discover(&self) -> anyhow::Result<Vec<ExpressionSite>> {
        (**self).discover()
    }
}
