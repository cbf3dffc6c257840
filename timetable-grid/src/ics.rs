use ics::{
    escape_text,
    properties::{Description, DtEnd, DtStart, Location, Organizer, Summary},
};

use crate::{occurrence_date, Course, Snapshot};

impl Snapshot {
    /// Expand every course over its weeks into dated events.
    ///
    /// Times are floating local times, the semester has no time zone.
    #[must_use]
    pub fn to_ics(&self) -> ics::ICalendar<'_> {
        let mut icalendar = ics::ICalendar::new("2.0", &self.settings.semester_name);

        for course in &self.courses {
            for event in course.to_ics(self.settings.first_monday) {
                icalendar.add_event(event);
            }
        }

        icalendar
    }
}

impl Course {
    #[must_use]
    pub fn to_ics(&self, first_monday: chrono::NaiveDate) -> Vec<ics::Event<'_>> {
        let mut events = Vec::with_capacity(self.weeks.len());

        for &week in &self.weeks {
            let Some(date) = occurrence_date(first_monday, week, self.weekday) else {
                continue;
            };

            let start = format!(
                "{}T{}00",
                date.format("%Y%m%d"),
                self.start_time.format("%H%M")
            );

            let end = format!(
                "{}T{}00",
                date.format("%Y%m%d"),
                self.end_time.format("%H%M")
            );

            let id = format!("course-{}-week-{}@timetable", self.id, week);

            let mut ics_event = ics::Event::new(id, start.clone());

            ics_event.push(DtStart::new(start));
            ics_event.push(DtEnd::new(end));
            ics_event.push(Summary::new(escape_text(self.title.as_str())));

            if let Some(location) = &self.location {
                ics_event.push(Location::new(escape_text(location.as_str())));
            }

            if let Some(teacher) = &self.teacher {
                ics_event.push(Organizer::new(escape_text(teacher.as_str())));
            }

            if let Some(remark) = &self.remark {
                ics_event.push(Description::new(escape_text(remark.as_str())));
            }

            events.push(ics_event);
        }

        events
    }
}
