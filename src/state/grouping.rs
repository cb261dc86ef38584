use scores_api::EventRecord;

/// Events of one competition, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategoryGroup<'a> {
    pub name: &'a str,
    pub events: Vec<&'a EventRecord>,
}

/// All competitions of one sport, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub name: &'a str,
    pub sub_categories: Vec<SubCategoryGroup<'a>>,
}

impl<'a> CategoryGroup<'a> {
    pub fn events(&self) -> impl Iterator<Item = &'a EventRecord> + '_ {
        self.sub_categories.iter().flat_map(|s| s.events.iter().copied())
    }
}

/// category → sub-category → events, preserving first-seen order at both levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouped<'a> {
    pub categories: Vec<CategoryGroup<'a>>,
}

impl<'a> Grouped<'a> {
    pub fn category(&self, name: &str) -> Option<&CategoryGroup<'a>> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> Vec<&'a str> {
        self.categories.iter().map(|c| c.name).collect()
    }

    /// Flatten back into a list, category by category.
    #[cfg(test)]
    pub fn flatten(&self) -> Vec<&'a EventRecord> {
        self.categories.iter().flat_map(|c| c.events()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.sub_categories.iter())
            .map(|s| s.events.len())
            .sum()
    }
}

/// Partition events by category then sub-category. No filtering happens here.
pub fn group_events<'a, I>(events: I) -> Grouped<'a>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    let mut grouped = Grouped::default();
    for event in events {
        let idx = match grouped.categories.iter().position(|c| c.name == event.category) {
            Some(idx) => idx,
            None => {
                grouped.categories.push(CategoryGroup {
                    name: event.category.as_str(),
                    sub_categories: Vec::new(),
                });
                grouped.categories.len() - 1
            }
        };
        let category = &mut grouped.categories[idx];

        match category
            .sub_categories
            .iter_mut()
            .find(|s| s.name == event.sub_category)
        {
            Some(sub) => sub.events.push(event),
            None => category.sub_categories.push(SubCategoryGroup {
                name: event.sub_category.as_str(),
                events: vec![event],
            }),
        }
    }
    grouped
}
