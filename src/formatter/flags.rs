// src/formatter/flags.rs
//! Maritime Identification Digits (ITU MID table): MID, flag state and its
//! ISO 3166-1 alpha-2 code.

pub(super) const MID_COUNTRIES: &[(u16, &str, &str)] = &[
    (201, "Albania", "AL"),
    (202, "Andorra", "AD"),
    (203, "Austria", "AT"),
    (204, "Portugal", "PT"),
    (205, "Belgium", "BE"),
    (206, "Belarus", "BY"),
    (207, "Bulgaria", "BG"),
    (208, "Vatican City", "VA"),
    (209, "Cyprus", "CY"),
    (210, "Cyprus", "CY"),
    (211, "Germany", "DE"),
    (212, "Cyprus", "CY"),
    (213, "Georgia", "GE"),
    (214, "Moldova", "MD"),
    (215, "Malta", "MT"),
    (216, "Armenia", "AM"),
    (218, "Germany", "DE"),
    (219, "Denmark", "DK"),
    (220, "Denmark", "DK"),
    (224, "Spain", "ES"),
    (225, "Spain", "ES"),
    (226, "France", "FR"),
    (227, "France", "FR"),
    (228, "France", "FR"),
    (229, "Malta", "MT"),
    (230, "Finland", "FI"),
    (231, "Faroe Islands", "FO"),
    (232, "United Kingdom", "GB"),
    (233, "United Kingdom", "GB"),
    (234, "United Kingdom", "GB"),
    (235, "United Kingdom", "GB"),
    (236, "Gibraltar", "GI"),
    (237, "Greece", "GR"),
    (238, "Croatia", "HR"),
    (239, "Greece", "GR"),
    (240, "Greece", "GR"),
    (241, "Greece", "GR"),
    (242, "Morocco", "MA"),
    (243, "Hungary", "HU"),
    (244, "Netherlands", "NL"),
    (245, "Netherlands", "NL"),
    (246, "Netherlands", "NL"),
    (247, "Italy", "IT"),
    (248, "Malta", "MT"),
    (249, "Malta", "MT"),
    (250, "Ireland", "IE"),
    (251, "Iceland", "IS"),
    (252, "Liechtenstein", "LI"),
    (253, "Luxembourg", "LU"),
    (254, "Monaco", "MC"),
    (255, "Portugal", "PT"),
    (256, "Malta", "MT"),
    (257, "Norway", "NO"),
    (258, "Norway", "NO"),
    (259, "Norway", "NO"),
    (261, "Poland", "PL"),
    (262, "Montenegro", "ME"),
    (263, "Portugal", "PT"),
    (264, "Romania", "RO"),
    (265, "Sweden", "SE"),
    (266, "Sweden", "SE"),
    (267, "Slovakia", "SK"),
    (268, "San Marino", "SM"),
    (269, "Switzerland", "CH"),
    (270, "Czechia", "CZ"),
    (271, "Türkiye", "TR"),
    (272, "Ukraine", "UA"),
    (273, "Russia", "RU"),
    (274, "North Macedonia", "MK"),
    (275, "Latvia", "LV"),
    (276, "Estonia", "EE"),
    (277, "Lithuania", "LT"),
    (278, "Slovenia", "SI"),
    (279, "Serbia", "RS"),
    (301, "Anguilla", "AI"),
    (303, "United States", "US"),
    (304, "Antigua and Barbuda", "AG"),
    (305, "Antigua and Barbuda", "AG"),
    (306, "Curaçao", "CW"),
    (307, "Aruba", "AW"),
    (308, "Bahamas", "BS"),
    (309, "Bahamas", "BS"),
    (310, "Bermuda", "BM"),
    (311, "Bahamas", "BS"),
    (312, "Belize", "BZ"),
    (314, "Barbados", "BB"),
    (316, "Canada", "CA"),
    (319, "Cayman Islands", "KY"),
    (321, "Costa Rica", "CR"),
    (323, "Cuba", "CU"),
    (325, "Dominica", "DM"),
    (327, "Dominican Republic", "DO"),
    (329, "Guadeloupe", "GP"),
    (330, "Grenada", "GD"),
    (331, "Greenland", "GL"),
    (332, "Guatemala", "GT"),
    (334, "Honduras", "HN"),
    (336, "Haiti", "HT"),
    (338, "United States", "US"),
    (339, "Jamaica", "JM"),
    (341, "Saint Kitts and Nevis", "KN"),
    (343, "Saint Lucia", "LC"),
    (345, "Mexico", "MX"),
    (347, "Martinique", "MQ"),
    (348, "Montserrat", "MS"),
    (350, "Nicaragua", "NI"),
    (351, "Panama", "PA"),
    (352, "Panama", "PA"),
    (353, "Panama", "PA"),
    (354, "Panama", "PA"),
    (355, "Panama", "PA"),
    (356, "Panama", "PA"),
    (357, "Panama", "PA"),
    (358, "Puerto Rico", "PR"),
    (359, "El Salvador", "SV"),
    (361, "Saint Pierre and Miquelon", "PM"),
    (362, "Trinidad and Tobago", "TT"),
    (364, "Turks and Caicos Islands", "TC"),
    (366, "United States", "US"),
    (367, "United States", "US"),
    (368, "United States", "US"),
    (369, "United States", "US"),
    (370, "Panama", "PA"),
    (371, "Panama", "PA"),
    (372, "Panama", "PA"),
    (373, "Panama", "PA"),
    (374, "Panama", "PA"),
    (375, "Saint Vincent and the Grenadines", "VC"),
    (376, "Saint Vincent and the Grenadines", "VC"),
    (377, "Saint Vincent and the Grenadines", "VC"),
    (378, "British Virgin Islands", "VG"),
    (379, "United States Virgin Islands", "VI"),
    (401, "Afghanistan", "AF"),
    (403, "Saudi Arabia", "SA"),
    (405, "Bangladesh", "BD"),
    (408, "Bahrain", "BH"),
    (410, "Bhutan", "BT"),
    (412, "China", "CN"),
    (413, "China", "CN"),
    (414, "China", "CN"),
    (416, "Taiwan", "TW"),
    (417, "Sri Lanka", "LK"),
    (419, "India", "IN"),
    (422, "Iran", "IR"),
    (423, "Azerbaijan", "AZ"),
    (425, "Iraq", "IQ"),
    (428, "Israel", "IL"),
    (431, "Japan", "JP"),
    (432, "Japan", "JP"),
    (434, "Turkmenistan", "TM"),
    (436, "Kazakhstan", "KZ"),
    (437, "Uzbekistan", "UZ"),
    (438, "Jordan", "JO"),
    (440, "South Korea", "KR"),
    (441, "South Korea", "KR"),
    (443, "Palestine", "PS"),
    (445, "North Korea", "KP"),
    (447, "Kuwait", "KW"),
    (450, "Lebanon", "LB"),
    (451, "Kyrgyzstan", "KG"),
    (453, "Macao", "MO"),
    (455, "Maldives", "MV"),
    (457, "Mongolia", "MN"),
    (459, "Nepal", "NP"),
    (461, "Oman", "OM"),
    (463, "Pakistan", "PK"),
    (466, "Qatar", "QA"),
    (468, "Syria", "SY"),
    (470, "United Arab Emirates", "AE"),
    (471, "United Arab Emirates", "AE"),
    (472, "Tajikistan", "TJ"),
    (473, "Yemen", "YE"),
    (475, "Yemen", "YE"),
    (477, "Hong Kong", "HK"),
    (478, "Bosnia and Herzegovina", "BA"),
    (501, "Adélie Land", "FR"),
    (503, "Australia", "AU"),
    (506, "Myanmar", "MM"),
    (508, "Brunei", "BN"),
    (510, "Micronesia", "FM"),
    (511, "Palau", "PW"),
    (512, "New Zealand", "NZ"),
    (514, "Cambodia", "KH"),
    (515, "Cambodia", "KH"),
    (516, "Christmas Island", "CX"),
    (518, "Cook Islands", "CK"),
    (520, "Fiji", "FJ"),
    (523, "Cocos (Keeling) Islands", "CC"),
    (525, "Indonesia", "ID"),
    (529, "Kiribati", "KI"),
    (531, "Laos", "LA"),
    (533, "Malaysia", "MY"),
    (536, "Northern Mariana Islands", "MP"),
    (538, "Marshall Islands", "MH"),
    (540, "New Caledonia", "NC"),
    (542, "Niue", "NU"),
    (544, "Nauru", "NR"),
    (546, "French Polynesia", "PF"),
    (548, "Philippines", "PH"),
    (550, "Timor-Leste", "TL"),
    (553, "Papua New Guinea", "PG"),
    (555, "Pitcairn Islands", "PN"),
    (557, "Solomon Islands", "SB"),
    (559, "American Samoa", "AS"),
    (561, "Samoa", "WS"),
    (563, "Singapore", "SG"),
    (564, "Singapore", "SG"),
    (565, "Singapore", "SG"),
    (566, "Singapore", "SG"),
    (567, "Thailand", "TH"),
    (570, "Tonga", "TO"),
    (572, "Tuvalu", "TV"),
    (574, "Vietnam", "VN"),
    (576, "Vanuatu", "VU"),
    (577, "Vanuatu", "VU"),
    (578, "Wallis and Futuna", "WF"),
    (601, "South Africa", "ZA"),
    (603, "Angola", "AO"),
    (605, "Algeria", "DZ"),
    (608, "Ascension Island", "SH"),
    (609, "Burundi", "BI"),
    (610, "Benin", "BJ"),
    (611, "Botswana", "BW"),
    (612, "Central African Republic", "CF"),
    (613, "Cameroon", "CM"),
    (615, "Congo", "CG"),
    (616, "Comoros", "KM"),
    (617, "Cabo Verde", "CV"),
    (619, "Côte d'Ivoire", "CI"),
    (620, "Comoros", "KM"),
    (621, "Djibouti", "DJ"),
    (622, "Egypt", "EG"),
    (624, "Ethiopia", "ET"),
    (625, "Eritrea", "ER"),
    (626, "Gabon", "GA"),
    (627, "Ghana", "GH"),
    (629, "Gambia", "GM"),
    (630, "Guinea-Bissau", "GW"),
    (631, "Equatorial Guinea", "GQ"),
    (632, "Guinea", "GN"),
    (633, "Burkina Faso", "BF"),
    (634, "Kenya", "KE"),
    (636, "Liberia", "LR"),
    (637, "Liberia", "LR"),
    (638, "South Sudan", "SS"),
    (642, "Libya", "LY"),
    (644, "Lesotho", "LS"),
    (645, "Mauritius", "MU"),
    (647, "Madagascar", "MG"),
    (649, "Mali", "ML"),
    (650, "Mozambique", "MZ"),
    (654, "Mauritania", "MR"),
    (655, "Malawi", "MW"),
    (656, "Niger", "NE"),
    (657, "Nigeria", "NG"),
    (659, "Namibia", "NA"),
    (660, "Réunion", "RE"),
    (661, "Rwanda", "RW"),
    (662, "Sudan", "SD"),
    (663, "Senegal", "SN"),
    (664, "Seychelles", "SC"),
    (665, "Saint Helena", "SH"),
    (666, "Somalia", "SO"),
    (667, "Sierra Leone", "SL"),
    (668, "São Tomé and Príncipe", "ST"),
    (669, "Eswatini", "SZ"),
    (670, "Chad", "TD"),
    (671, "Togo", "TG"),
    (672, "Tunisia", "TN"),
    (674, "Tanzania", "TZ"),
    (675, "Uganda", "UG"),
    (676, "DR Congo", "CD"),
    (677, "Tanzania", "TZ"),
    (678, "Zambia", "ZM"),
    (679, "Zimbabwe", "ZW"),
    (701, "Argentina", "AR"),
    (710, "Brazil", "BR"),
    (720, "Bolivia", "BO"),
    (725, "Chile", "CL"),
    (730, "Colombia", "CO"),
    (735, "Ecuador", "EC"),
    (740, "Falkland Islands", "FK"),
    (745, "French Guiana", "GF"),
    (750, "Guyana", "GY"),
    (755, "Paraguay", "PY"),
    (760, "Peru", "PE"),
    (765, "Suriname", "SR"),
    (770, "Uruguay", "UY"),
    (775, "Venezuela", "VE"),
];
